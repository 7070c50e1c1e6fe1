//! Storage driver abstraction for Berth.
//!
//! A [`StorageDriver`] is a filesystem-like key/value back-end addressed by
//! absolute paths. This crate provides:
//! - The driver contract and its error taxonomy
//! - Path grammar validation shared by every driver
//! - A process-wide driver factory registry
//! - [`Base`], the validation and tracing middleware every concrete driver
//!   is expected to be wrapped in

pub mod base;
pub mod error;
pub mod factory;
pub mod fileinfo;
pub mod version;

pub use base::Base;
pub use error::{DriverError, DriverResult};
pub use factory::{create, register, StorageDriverFactory};
pub use fileinfo::FileInfo;
pub use version::{Version, CURRENT_VERSION};

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use regex::Regex;
use std::pin::Pin;
use std::sync::LazyLock;

/// A boxed stream of bytes for streaming reads and writes.
pub type ByteStream = Pin<Box<dyn Stream<Item = DriverResult<Bytes>> + Send>>;

/// The regular expression every file path must match: absolute, with one or
/// more slash-separated components of letters, digits, periods, underscores
/// or hyphens. The bare root `/` is accepted only by [`StorageDriver::list`].
pub static PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(/[A-Za-z0-9._-]+)+$").expect("path regex is valid")
});

/// Options for [`StorageDriver::url_for`].
#[derive(Clone, Debug)]
pub struct UrlOptions {
    /// The HTTP method the returned URL will be used with.
    pub method: String,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
        }
    }
}

/// A filesystem-like key/value storage back-end.
///
/// All paths are absolute and validated against [`static@PATH_REGEX`] by the
/// [`Base`] wrapper before they reach an implementation.
#[async_trait]
pub trait StorageDriver: Send + Sync + 'static {
    /// Human-readable name of the driver, used in error messages and trace
    /// scopes. By convention this is the registration name.
    fn name(&self) -> &'static str;

    /// Retrieve the content stored at `path`. Intended for small objects.
    async fn get_content(&self, path: &str) -> DriverResult<Bytes>;

    /// Store `content` at `path`. Intended for small objects.
    async fn put_content(&self, path: &str, content: Bytes) -> DriverResult<()>;

    /// Open a byte stream over the content at `path`, starting at `offset`.
    /// A nonzero offset resumes a previous read.
    async fn read_stream(&self, path: &str, offset: u64) -> DriverResult<ByteStream>;

    /// Store the stream's contents at `path` starting at `offset`, returning
    /// the number of bytes written. The offset must not exceed the current
    /// size of the content at `path`.
    async fn write_stream(
        &self,
        path: &str,
        offset: u64,
        content: ByteStream,
    ) -> DriverResult<u64>;

    /// Retrieve the [`FileInfo`] for `path`.
    async fn stat(&self, path: &str) -> DriverResult<FileInfo>;

    /// List the direct descendants of `path`.
    async fn list(&self, path: &str) -> DriverResult<Vec<String>>;

    /// Move the object at `source_path` to `dest_path`, removing the
    /// original. May be no more efficient than a copy followed by a delete.
    async fn move_path(&self, source_path: &str, dest_path: &str) -> DriverResult<()>;

    /// Recursively delete all objects stored at `path` and its subpaths.
    async fn delete(&self, path: &str) -> DriverResult<()>;

    /// Return a URL from which the content at `path` may be fetched directly,
    /// honoring `options`. Drivers without direct access return
    /// [`DriverError::UnsupportedMethod`].
    async fn url_for(&self, path: &str, options: &UrlOptions) -> DriverResult<String>;
}
