//! In-memory object store and layer implementation.

use crate::client::BlobStream;
use crate::object_store::{Layer, LayerReader, LayerWriter, ObjectStore};
use crate::{Error, Result};
use async_trait::async_trait;
use berth_core::{Digest, SignedManifest};
use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

/// Chunk size for reader streams (64 KiB).
const READER_CHUNK_SIZE: usize = 64 * 1024;

/// In-memory [`ObjectStore`]: manifests by `(name, tag)`, layers by digest,
/// both guarded by a single mutex. The mutex is never held across I/O.
#[derive(Default)]
pub struct MemoryObjectStore {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    manifests: HashMap<(String, String), SignedManifest>,
    layers: HashMap<Digest, MemoryLayer>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn manifest(&self, name: &str, tag: &str) -> Result<SignedManifest> {
        let state = self.state.lock();
        state
            .manifests
            .get(&(name.to_string(), tag.to_string()))
            .cloned()
            .ok_or_else(|| Error::ManifestNotFound {
                name: name.to_string(),
                tag: tag.to_string(),
            })
    }

    async fn write_manifest(
        &self,
        name: &str,
        tag: &str,
        manifest: &SignedManifest,
    ) -> Result<()> {
        let mut state = self.state.lock();
        state
            .manifests
            .insert((name.to_string(), tag.to_string()), manifest.clone());
        Ok(())
    }

    async fn layer(&self, digest: &Digest) -> Result<Arc<dyn Layer>> {
        let mut state = self.state.lock();
        let layer = state
            .layers
            .entry(digest.clone())
            .or_insert_with(MemoryLayer::new)
            .clone();
        Ok(Arc::new(layer))
    }
}

/// An in-memory layer. Cloning shares the underlying state.
#[derive(Clone)]
pub struct MemoryLayer {
    shared: Arc<LayerShared>,
}

struct LayerShared {
    state: Mutex<LayerState>,
    closed: Notify,
}

#[derive(Default)]
struct LayerState {
    contents: Option<BytesMut>,
    expected_size: u64,
    writing: bool,
}

impl MemoryLayer {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(LayerShared {
                state: Mutex::new(LayerState::default()),
                closed: Notify::new(),
            }),
        }
    }
}

impl Default for MemoryLayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Layer for MemoryLayer {
    async fn reader(&self) -> Result<Box<dyn LayerReader>> {
        let state = self.shared.state.lock();
        let Some(contents) = &state.contents else {
            return Err(Error::LayerUnwritten);
        };
        if state.writing {
            return Err(Error::LayerLocked);
        }
        Ok(Box::new(MemoryLayerReader {
            data: Bytes::from(contents.clone()),
            expected_size: state.expected_size,
        }))
    }

    async fn writer(&self) -> Result<Box<dyn LayerWriter>> {
        let mut state = self.shared.state.lock();
        match &state.contents {
            Some(contents) => {
                if state.writing {
                    return Err(Error::LayerLocked);
                }
                if state.expected_size == contents.len() as u64 {
                    return Err(Error::LayerAlreadyExists);
                }
                // Size mismatch: a previous writer left the layer partial,
                // resuming is permitted.
            }
            None => {
                state.contents = Some(BytesMut::new());
            }
        }
        state.writing = true;
        Ok(Box::new(MemoryLayerWriter {
            shared: self.shared.clone(),
            closed: false,
        }))
    }

    async fn wait(&self) -> Result<()> {
        loop {
            // Register for the close broadcast before checking state, so a
            // close landing between the check and the await is not missed.
            let closed = self.shared.closed.notified();
            {
                let state = self.shared.state.lock();
                if state.contents.is_none() {
                    return Err(Error::LayerUnwritten);
                }
                if !state.writing {
                    return Ok(());
                }
            }
            closed.await;
        }
    }
}

struct MemoryLayerReader {
    data: Bytes,
    expected_size: u64,
}

impl LayerReader for MemoryLayerReader {
    fn current_size(&self) -> u64 {
        self.data.len() as u64
    }

    fn size(&self) -> u64 {
        self.expected_size
    }

    fn into_stream(self: Box<Self>) -> BlobStream {
        let mut chunks = Vec::new();
        let mut rest = self.data;
        while rest.len() > READER_CHUNK_SIZE {
            chunks.push(Ok(rest.split_to(READER_CHUNK_SIZE)));
        }
        if !rest.is_empty() {
            chunks.push(Ok(rest));
        }
        Box::pin(futures::stream::iter(chunks))
    }
}

struct MemoryLayerWriter {
    shared: Arc<LayerShared>,
    closed: bool,
}

impl MemoryLayerWriter {
    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.shared.state.lock().writing = false;
        self.shared.closed.notify_waiters();
    }
}

#[async_trait]
impl LayerWriter for MemoryLayerWriter {
    async fn write(&mut self, data: Bytes) -> Result<()> {
        if self.closed {
            return Err(Error::LayerClosed);
        }
        let mut state = self.shared.state.lock();
        if state.expected_size == 0 {
            return Err(Error::SizeNotSet);
        }
        match state.contents.as_mut() {
            Some(contents) => {
                contents.extend_from_slice(&data);
                Ok(())
            }
            None => Err(Error::LayerClosed),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.release();
        Ok(())
    }

    fn current_size(&self) -> u64 {
        let state = self.shared.state.lock();
        state
            .contents
            .as_ref()
            .map(|contents| contents.len() as u64)
            .unwrap_or(0)
    }

    fn size(&self) -> u64 {
        self.shared.state.lock().expected_size
    }

    fn set_size(&mut self, size: u64) -> Result<()> {
        if self.closed {
            return Err(Error::LayerClosed);
        }
        let mut state = self.shared.state.lock();
        if !state.writing {
            return Err(Error::LayerClosed);
        }
        state.expected_size = size;
        Ok(())
    }
}

impl Drop for MemoryLayerWriter {
    fn drop(&mut self) {
        // An abandoned writer (including one whose transfer future was
        // cancelled) must not wedge waiters.
        self.release();
    }
}
