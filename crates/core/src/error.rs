//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("manifest references {layers} layers but {history} history entries")]
    ManifestShape { layers: usize, history: usize },

    #[error("image has no layers")]
    EmptyManifest,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation unsupported by this back-end: {0}")]
    Unsupported(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
