//! Caller-side validation applied before an item reaches the repository.
//!
//! The repository accepts whatever it is given; front-ends run these checks
//! first so users get a message instead of a malformed record.

use crate::error::ApiError;

/// Default upper bound for uploaded files, in raw bytes.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 500_000;

/// Trim and check a display name. Returns the trimmed name.
pub fn validate_name(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::ValidationError(
            "Name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Reject files larger than `max_bytes`.
pub fn validate_file_size(size: u64, max_bytes: u64) -> Result<(), ApiError> {
    if size > max_bytes {
        return Err(ApiError::ValidationError(format!(
            "File is too large ({} bytes, max {} bytes)",
            size, max_bytes
        )));
    }
    Ok(())
}

/// Require a topic before asking for generated note content.
pub fn validate_topic(topic: &str) -> Result<(), ApiError> {
    if topic.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "Give the note a title before generating its content".to_string(),
        ));
    }
    Ok(())
}
