use async_trait::async_trait;
use berth_client::{BlobStream, Client, Error, Result};
use berth_core::{Digest, SignedManifest};
use bytes::Bytes;
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted remote registry for transfer engine tests.
///
/// Counts every call, records blob request offsets, and tracks the peak
/// number of concurrently executing blob fetches so tests can assert the
/// transfer window bound.
#[derive(Default)]
pub struct MockClient {
    state: Mutex<MockState>,
    pub get_blob_calls: AtomicUsize,
    pub initiate_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub put_manifest_calls: AtomicUsize,
    inflight: AtomicUsize,
    pub max_inflight: AtomicUsize,
    delay: Option<Duration>,
}

#[derive(Default)]
struct MockState {
    manifests: HashMap<(String, String), SignedManifest>,
    blobs: HashMap<Digest, Bytes>,
    present: HashSet<Digest>,
    fail_get_blob: HashMap<Digest, String>,
    fail_blob_length: HashMap<Digest, String>,
    get_blob_offsets: Vec<(Digest, u64)>,
    uploads: HashMap<Digest, Bytes>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay each blob fetch, holding it in flight long enough for
    /// concurrency assertions.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn put_remote_manifest(&self, name: &str, tag: &str, manifest: SignedManifest) {
        self.state
            .lock()
            .manifests
            .insert((name.to_string(), tag.to_string()), manifest);
    }

    pub fn put_remote_blob(&self, contents: &Bytes) {
        let digest = Digest::from_content(contents);
        self.state.lock().blobs.insert(digest, contents.clone());
    }

    /// Make `blob_length` answer `Some` for this digest.
    pub fn mark_present(&self, digest: &Digest) {
        self.state.lock().present.insert(digest.clone());
    }

    pub fn fail_get_blob(&self, digest: &Digest, message: &str) {
        self.state
            .lock()
            .fail_get_blob
            .insert(digest.clone(), message.to_string());
    }

    pub fn fail_blob_length(&self, digest: &Digest, message: &str) {
        self.state
            .lock()
            .fail_blob_length
            .insert(digest.clone(), message.to_string());
    }

    /// Offsets requested from `get_blob`, in call order.
    pub fn get_blob_offsets(&self) -> Vec<(Digest, u64)> {
        self.state.lock().get_blob_offsets.clone()
    }

    /// Content sealed by `upload_blob`, by digest.
    pub fn uploaded(&self, digest: &Digest) -> Option<Bytes> {
        self.state.lock().uploads.get(digest).cloned()
    }
}

#[async_trait]
impl Client for MockClient {
    async fn get_image_manifest(&self, name: &str, tag: &str) -> Result<SignedManifest> {
        self.state
            .lock()
            .manifests
            .get(&(name.to_string(), tag.to_string()))
            .cloned()
            .ok_or_else(|| Error::Remote(format!("manifest unknown: {name}:{tag}")))
    }

    async fn put_image_manifest(
        &self,
        name: &str,
        tag: &str,
        manifest: &SignedManifest,
    ) -> Result<()> {
        self.put_manifest_calls.fetch_add(1, Ordering::SeqCst);
        self.put_remote_manifest(name, tag, manifest.clone());
        Ok(())
    }

    async fn get_blob(
        &self,
        _name: &str,
        digest: &Digest,
        offset: u64,
    ) -> Result<(BlobStream, u64)> {
        self.get_blob_calls.fetch_add(1, Ordering::SeqCst);
        let inflight = self.inflight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_inflight.fetch_max(inflight, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.inflight.fetch_sub(1, Ordering::SeqCst);

        let (content, failure) = {
            let mut state = self.state.lock();
            state.get_blob_offsets.push((digest.clone(), offset));
            (
                state.blobs.get(digest).cloned(),
                state.fail_get_blob.get(digest).cloned(),
            )
        };

        if let Some(message) = failure {
            return Err(Error::Remote(message));
        }
        let content =
            content.ok_or_else(|| Error::Remote(format!("blob unknown: {digest}")))?;
        if offset > content.len() as u64 {
            return Err(Error::Remote(format!("offset {offset} out of range")));
        }

        let remainder = content.slice(offset as usize..);
        let length = remainder.len() as u64;
        Ok((Box::pin(futures::stream::iter([Ok(remainder)])), length))
    }

    async fn blob_length(&self, _name: &str, digest: &Digest) -> Result<Option<u64>> {
        let state = self.state.lock();
        if let Some(message) = state.fail_blob_length.get(digest) {
            return Err(Error::Remote(message.clone()));
        }
        if !state.present.contains(digest) {
            return Ok(None);
        }
        Ok(Some(
            state
                .blobs
                .get(digest)
                .map(|content| content.len() as u64)
                .unwrap_or(0),
        ))
    }

    async fn initiate_blob_upload(&self, name: &str) -> Result<String> {
        self.initiate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("/v2/{name}/blobs/uploads/{}", uuid_like()))
    }

    async fn upload_blob(
        &self,
        _location: &str,
        mut blob: BlobStream,
        length: u64,
        digest: &Digest,
    ) -> Result<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        let mut received = Vec::new();
        while let Some(chunk) = blob.next().await {
            received.extend_from_slice(&chunk?);
        }
        if received.len() as u64 != length {
            return Err(Error::Remote(format!(
                "upload length mismatch: announced {length}, received {}",
                received.len()
            )));
        }

        let mut state = self.state.lock();
        state.uploads.insert(digest.clone(), Bytes::from(received));
        state.present.insert(digest.clone());
        Ok(())
    }
}

/// Cheap unique-enough token for upload locations.
fn uuid_like() -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    format!("upload-{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}
