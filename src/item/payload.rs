//! File payload encoding.
//!
//! Uploaded files are stored inline as `data:<mime>;base64,<body>` URLs, the
//! same shape a browser `FileReader::readAsDataURL` produces.

use crate::error::ApiError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Encode `bytes` as a base64 data URL.
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Encode `bytes`, guessing the MIME type from `file_name`.
pub fn encode_file(file_name: &str, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(Path::new(file_name)).first_or_octet_stream();
    encode_data_url(bytes, mime.essence_str())
}

/// Decoded data URL: MIME type and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decode a base64 data URL produced by [`encode_data_url`].
pub fn decode_data_url(data: &str) -> Result<DecodedPayload, ApiError> {
    let rest = data.strip_prefix("data:").ok_or_else(|| {
        ApiError::ValidationError("File payload is not a data URL".to_string())
    })?;
    let (header, body) = rest.split_once(',').ok_or_else(|| {
        ApiError::ValidationError("File payload is missing its ',' separator".to_string())
    })?;
    let mime = header.strip_suffix(";base64").ok_or_else(|| {
        ApiError::ValidationError("File payload is not base64 encoded".to_string())
    })?;
    let bytes = STANDARD
        .decode(body)
        .map_err(|e| ApiError::ValidationError(format!("Invalid base64 payload: {}", e)))?;
    let mime = if mime.is_empty() {
        "application/octet-stream".to_string()
    } else {
        mime.to_string()
    };
    Ok(DecodedPayload { mime, bytes })
}
