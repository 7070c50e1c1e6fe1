//! Server-side storage layer for Berth.
//!
//! Builds on the [`berth_driver`] abstraction to provide the pieces the
//! registry needs on top of raw key/value storage:
//! - Content-addressed path layout ([`paths`])
//! - Recursive pre-order traversal ([`walk`])
//! - Garbage collection of abandoned upload sessions ([`purge`])
//! - The redirect-or-stream blob server ([`blob`])

pub mod blob;
pub mod error;
pub mod paths;
pub mod purge;
pub mod walk;

pub use blob::BlobServer;
pub use error::{Error, Result};
pub use paths::{blob_data_path, repositories_root, started_at_path, upload_dir_path};
pub use purge::{purge_uploads, spawn_purge_task, PurgeError};
pub use walk::{walk, WalkControl};

use berth_driver::{DriverError, DriverResult, StorageDriver};

/// Test whether a path exists in the given driver.
pub async fn exists(driver: &dyn StorageDriver, path: &str) -> DriverResult<bool> {
    match driver.stat(path).await {
        Ok(_) => Ok(true),
        Err(DriverError::PathNotFound(_)) => Ok(false),
        Err(err) => Err(err),
    }
}
