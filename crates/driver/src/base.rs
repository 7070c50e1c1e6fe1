//! Validation and tracing middleware shared by every storage driver.
//!
//! [`Base`] wraps a concrete driver and performs the checks common to all of
//! them: each path argument is validated against the path grammar before the
//! inner driver is touched, and every operation runs inside a tracing span
//! carrying the driver name and arguments. No business logic lives here;
//! concrete drivers are expected to hand callers an already-wrapped instance.

use crate::{ByteStream, DriverError, DriverResult, FileInfo, StorageDriver, UrlOptions};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::instrument;

/// Decorator enforcing path validation and trace scopes around a driver.
pub struct Base {
    inner: Box<dyn StorageDriver>,
}

impl Base {
    /// Wrap a concrete driver.
    pub fn new(inner: Box<dyn StorageDriver>) -> Self {
        Self { inner }
    }

    fn check_path(&self, path: &str) -> DriverResult<()> {
        if crate::PATH_REGEX.is_match(path) {
            Ok(())
        } else {
            Err(DriverError::InvalidPath(path.to_string()))
        }
    }
}

#[async_trait]
impl StorageDriver for Base {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    #[instrument(skip_all, fields(driver = self.inner.name(), path = path))]
    async fn get_content(&self, path: &str) -> DriverResult<Bytes> {
        self.check_path(path)?;
        self.inner.get_content(path).await
    }

    #[instrument(skip_all, fields(driver = self.inner.name(), path = path, size = content.len()))]
    async fn put_content(&self, path: &str, content: Bytes) -> DriverResult<()> {
        self.check_path(path)?;
        self.inner.put_content(path, content).await
    }

    #[instrument(skip_all, fields(driver = self.inner.name(), path = path, offset = offset))]
    async fn read_stream(&self, path: &str, offset: u64) -> DriverResult<ByteStream> {
        self.check_path(path)?;
        self.inner.read_stream(path, offset).await
    }

    #[instrument(skip_all, fields(driver = self.inner.name(), path = path, offset = offset))]
    async fn write_stream(
        &self,
        path: &str,
        offset: u64,
        content: ByteStream,
    ) -> DriverResult<u64> {
        self.check_path(path)?;
        self.inner.write_stream(path, offset, content).await
    }

    #[instrument(skip_all, fields(driver = self.inner.name(), path = path))]
    async fn stat(&self, path: &str) -> DriverResult<FileInfo> {
        self.check_path(path)?;
        self.inner.stat(path).await
    }

    #[instrument(skip_all, fields(driver = self.inner.name(), path = path))]
    async fn list(&self, path: &str) -> DriverResult<Vec<String>> {
        // The bare root is a valid listing target even though it is not a
        // valid object path.
        if path != "/" {
            self.check_path(path)?;
        }
        self.inner.list(path).await
    }

    #[instrument(skip_all, fields(driver = self.inner.name(), source = source_path, dest = dest_path))]
    async fn move_path(&self, source_path: &str, dest_path: &str) -> DriverResult<()> {
        self.check_path(source_path)?;
        self.check_path(dest_path)?;
        self.inner.move_path(source_path, dest_path).await
    }

    #[instrument(skip_all, fields(driver = self.inner.name(), path = path))]
    async fn delete(&self, path: &str) -> DriverResult<()> {
        self.check_path(path)?;
        self.inner.delete(path).await
    }

    #[instrument(skip_all, fields(driver = self.inner.name(), path = path, method = %options.method))]
    async fn url_for(&self, path: &str, options: &UrlOptions) -> DriverResult<String> {
        self.check_path(path)?;
        self.inner.url_for(path, options).await
    }
}
