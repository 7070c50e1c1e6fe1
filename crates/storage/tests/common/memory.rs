use async_trait::async_trait;
use berth_driver::{
    ByteStream, DriverError, DriverResult, FileInfo, StorageDriver, UrlOptions,
};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// In-memory driver for tests: a sorted map of file path to content, with
/// directories existing implicitly wherever a deeper file does.
pub struct MemoryDriver {
    files: Mutex<BTreeMap<String, Bytes>>,
    url_base: Option<String>,
}

impl MemoryDriver {
    /// A driver with no direct-access URLs (`url_for` is unsupported).
    pub fn new() -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            url_base: None,
        }
    }

    /// A driver that serves `url_for` as `<base><path>`.
    pub fn with_urls(base: impl Into<String>) -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            url_base: Some(base.into()),
        }
    }

    /// Seed a file without going through the driver API.
    pub fn seed(&self, path: &str, content: impl Into<Bytes>) {
        self.files.lock().insert(path.to_string(), content.into());
    }

    /// Whether any file exists at or below `path`.
    pub fn contains(&self, path: &str) -> bool {
        let files = self.files.lock();
        files.contains_key(path)
            || files
                .keys()
                .any(|key| key.starts_with(&format!("{path}/")))
    }

    fn is_dir(files: &BTreeMap<String, Bytes>, path: &str) -> bool {
        let prefix = format!("{path}/");
        files.keys().any(|key| key.starts_with(&prefix))
    }
}

#[async_trait]
impl StorageDriver for MemoryDriver {
    fn name(&self) -> &'static str {
        "inmemory"
    }

    async fn get_content(&self, path: &str) -> DriverResult<Bytes> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| DriverError::PathNotFound(path.to_string()))
    }

    async fn put_content(&self, path: &str, content: Bytes) -> DriverResult<()> {
        self.files.lock().insert(path.to_string(), content);
        Ok(())
    }

    async fn read_stream(&self, path: &str, offset: u64) -> DriverResult<ByteStream> {
        let content = self
            .files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| DriverError::PathNotFound(path.to_string()))?;
        if offset > content.len() as u64 {
            return Err(DriverError::InvalidOffset {
                path: path.to_string(),
                offset,
            });
        }
        let remainder = content.slice(offset as usize..);
        Ok(Box::pin(futures::stream::iter([Ok(remainder)])))
    }

    async fn write_stream(
        &self,
        path: &str,
        offset: u64,
        mut content: ByteStream,
    ) -> DriverResult<u64> {
        let existing = self.files.lock().get(path).cloned().unwrap_or_default();
        if offset > existing.len() as u64 {
            return Err(DriverError::InvalidOffset {
                path: path.to_string(),
                offset,
            });
        }

        let mut buffer = BytesMut::from(&existing[..offset as usize]);
        let mut written = 0u64;
        while let Some(chunk) = content.next().await {
            let chunk = chunk?;
            written += chunk.len() as u64;
            buffer.extend_from_slice(&chunk);
        }
        self.files.lock().insert(path.to_string(), buffer.freeze());
        Ok(written)
    }

    async fn stat(&self, path: &str) -> DriverResult<FileInfo> {
        let files = self.files.lock();
        if let Some(content) = files.get(path) {
            return Ok(FileInfo::file(
                path,
                content.len() as u64,
                OffsetDateTime::now_utc(),
            ));
        }
        if Self::is_dir(&files, path) {
            return Ok(FileInfo::dir(path, OffsetDateTime::now_utc()));
        }
        Err(DriverError::PathNotFound(path.to_string()))
    }

    async fn list(&self, path: &str) -> DriverResult<Vec<String>> {
        let files = self.files.lock();
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };

        let mut children: Vec<String> = Vec::new();
        for key in files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            let child = match rest.split_once('/') {
                Some((first, _)) => format!("{prefix}{first}"),
                None => key.clone(),
            };
            if children.last() != Some(&child) {
                children.push(child);
            }
        }
        Ok(children)
    }

    async fn move_path(&self, source_path: &str, dest_path: &str) -> DriverResult<()> {
        let mut files = self.files.lock();
        let moved: Vec<(String, String)> = files
            .keys()
            .filter_map(|key| {
                if key == source_path {
                    Some((key.clone(), dest_path.to_string()))
                } else {
                    key.strip_prefix(&format!("{source_path}/"))
                        .map(|rest| (key.clone(), format!("{dest_path}/{rest}")))
                }
            })
            .collect();
        if moved.is_empty() {
            return Err(DriverError::PathNotFound(source_path.to_string()));
        }
        for (from, to) in moved {
            if let Some(content) = files.remove(&from) {
                files.insert(to, content);
            }
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> DriverResult<()> {
        let mut files = self.files.lock();
        let doomed: Vec<String> = files
            .keys()
            .filter(|key| *key == path || key.starts_with(&format!("{path}/")))
            .cloned()
            .collect();
        if doomed.is_empty() {
            return Err(DriverError::PathNotFound(path.to_string()));
        }
        for key in doomed {
            files.remove(&key);
        }
        Ok(())
    }

    async fn url_for(&self, path: &str, _options: &UrlOptions) -> DriverResult<String> {
        match &self.url_base {
            Some(base) => Ok(format!("{base}{path}")),
            None => Err(DriverError::UnsupportedMethod),
        }
    }
}
