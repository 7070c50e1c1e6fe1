//! Storage driver error types.

use thiserror::Error;

/// Errors surfaced by storage driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("invalid offset {offset} for path: {path}")]
    InvalidOffset { path: String, offset: u64 },

    #[error("unsupported method")]
    UnsupportedMethod,

    #[error("storage driver not registered: {0}")]
    InvalidStorageDriver(String),

    #[error("invalid driver parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for driver operations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;
