//! Error types
//!
//! `StorageError` covers the key-value backend and record encoding.
//! `ApiError` is what repository, auth, generation and CLI operations return.

use thiserror::Error;

/// Errors raised by the persistent key-value layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Stored value for key '{key}' is not valid UTF-8")]
    InvalidEncoding { key: String },

    #[error("Corrupt record at key '{key}': {source}")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        match err {
            sled::Error::Io(io) => StorageError::IoError(io),
            other => StorageError::Backend(other.to_string()),
        }
    }
}

/// Errors surfaced by organizer operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid parent '{parent_id}': {reason}")]
    InvalidParent { parent_id: String, reason: String },

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Content provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Content generation failed: {0}")]
    GenerationFailed(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
