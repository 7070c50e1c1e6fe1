//! Local manifest and layer storage contracts.
//!
//! An [`ObjectStore`] approximates the engine-side storage a puller writes
//! into and a pusher reads from: manifests addressed by name and tag, layers
//! addressed by digest. Layers go through an explicit reader/writer protocol
//! so concurrent transfers of the same content coordinate instead of
//! clobbering each other.

use crate::client::BlobStream;
use crate::Result;
use async_trait::async_trait;
use berth_core::{Digest, SignedManifest};
use bytes::Bytes;
use std::sync::Arc;

/// Local storage for manifests and layers.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Retrieve the manifest stored under `name` and `tag`.
    async fn manifest(&self, name: &str, tag: &str) -> Result<SignedManifest>;

    /// Store a manifest under `name` and `tag`.
    async fn write_manifest(
        &self,
        name: &str,
        tag: &str,
        manifest: &SignedManifest,
    ) -> Result<()>;

    /// Return a handle to the layer with the given digest, creating an empty
    /// layer on first lookup.
    async fn layer(&self, digest: &Digest) -> Result<Arc<dyn Layer>>;
}

/// A content-addressed layer in the local store.
///
/// A layer may not be written to once it is complete; at most one writer
/// exists at any time.
#[async_trait]
pub trait Layer: Send + Sync {
    /// A reader over the completed layer. Fails with
    /// [`crate::Error::LayerUnwritten`] if no writer ever ran and
    /// [`crate::Error::LayerLocked`] while a writer holds the layer.
    async fn reader(&self) -> Result<Box<dyn LayerReader>>;

    /// The layer's writer. Fails with [`crate::Error::LayerAlreadyExists`]
    /// once the layer is complete and [`crate::Error::LayerLocked`] while
    /// another writer holds it; a partially written layer may be resumed.
    async fn writer(&self) -> Result<Box<dyn LayerWriter>>;

    /// Block until the layer can be read from.
    async fn wait(&self) -> Result<()>;
}

/// Read-only handle over a point-in-time snapshot of a layer.
pub trait LayerReader: Send {
    /// Number of bytes written to the layer at snapshot time.
    fn current_size(&self) -> u64;

    /// The full announced size of the layer.
    fn size(&self) -> u64;

    /// Consume the reader, yielding the snapshot as a byte stream.
    fn into_stream(self: Box<Self>) -> BlobStream;
}

/// Write-only handle to a layer. [`LayerWriter::set_size`] must be called
/// before the first write.
#[async_trait]
pub trait LayerWriter: Send {
    /// Append a chunk to the layer.
    async fn write(&mut self, data: Bytes) -> Result<()>;

    /// Finish writing: release the layer and wake all waiters. Idempotent,
    /// and also triggered by dropping the writer.
    async fn close(&mut self) -> Result<()>;

    /// Number of bytes written to the layer so far.
    fn current_size(&self) -> u64;

    /// The full announced size of the layer.
    fn size(&self) -> u64;

    /// Record the full size of the layer ahead of the first write.
    fn set_size(&mut self, size: u64) -> Result<()>;
}
