//! Storage layer error types.

use thiserror::Error;

/// Errors surfaced by the server-side storage layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("driver error: {0}")]
    Driver(#[from] berth_driver::DriverError),

    #[error(transparent)]
    Core(#[from] berth_core::Error),

    #[error("invalid header value: {0}")]
    Header(String),
}

/// Result type for storage layer operations.
pub type Result<T> = std::result::Result<T, Error>;
