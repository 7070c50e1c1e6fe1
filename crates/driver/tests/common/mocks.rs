use async_trait::async_trait;
use berth_driver::{
    ByteStream, DriverError, DriverResult, FileInfo, StorageDriver, UrlOptions,
};
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use time::OffsetDateTime;

/// Mock driver that counts how many calls reach it. Used to verify the Base
/// wrapper rejects invalid arguments before touching the inner driver.
pub struct CountingDriver {
    pub calls: Arc<AtomicUsize>,
}

impl CountingDriver {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageDriver for CountingDriver {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn get_content(&self, _path: &str) -> DriverResult<Bytes> {
        self.record();
        Ok(Bytes::from_static(b"content"))
    }

    async fn put_content(&self, _path: &str, _content: Bytes) -> DriverResult<()> {
        self.record();
        Ok(())
    }

    async fn read_stream(&self, _path: &str, _offset: u64) -> DriverResult<ByteStream> {
        self.record();
        Ok(Box::pin(futures::stream::empty()))
    }

    async fn write_stream(
        &self,
        _path: &str,
        _offset: u64,
        _content: ByteStream,
    ) -> DriverResult<u64> {
        self.record();
        Ok(0)
    }

    async fn stat(&self, path: &str) -> DriverResult<FileInfo> {
        self.record();
        Ok(FileInfo::file(path, 7, OffsetDateTime::UNIX_EPOCH))
    }

    async fn list(&self, _path: &str) -> DriverResult<Vec<String>> {
        self.record();
        Ok(Vec::new())
    }

    async fn move_path(&self, _source_path: &str, _dest_path: &str) -> DriverResult<()> {
        self.record();
        Ok(())
    }

    async fn delete(&self, _path: &str) -> DriverResult<()> {
        self.record();
        Ok(())
    }

    async fn url_for(&self, _path: &str, _options: &UrlOptions) -> DriverResult<String> {
        self.record();
        Err(DriverError::UnsupportedMethod)
    }
}
