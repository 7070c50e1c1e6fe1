//! Client error types.

use thiserror::Error;

/// Errors surfaced by the client transfer engine and local layer store.
#[derive(Debug, Error)]
pub enum Error {
    /// The layer is already complete locally; nothing to write.
    #[error("layer already exists")]
    LayerAlreadyExists,

    /// Another writer currently holds the layer.
    #[error("layer locked")]
    LayerLocked,

    /// The layer has never been written to.
    #[error("layer has not been written to yet")]
    LayerUnwritten,

    /// A writer must record the full size before the first write.
    #[error("size must be set before writing to layer")]
    SizeNotSet,

    /// The writer was closed and can no longer accept writes.
    #[error("layer is closed for writing")]
    LayerClosed,

    /// A transfer finished with fewer bytes than announced.
    #[error("incomplete layer: expected {expected} bytes, have {actual}")]
    IncompleteLayer { expected: u64, actual: u64 },

    /// No manifest is stored under the given name and tag.
    #[error("no manifest found for {name}:{tag}")]
    ManifestNotFound { name: String, tag: String },

    /// A sibling transfer failed and this one was cancelled before reporting.
    #[error("layer transfer aborted")]
    Aborted,

    /// The remote side reported a failure.
    #[error("remote error: {0}")]
    Remote(String),

    #[error(transparent)]
    Core(#[from] berth_core::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
