//! Blob descriptors and read access contracts.

use crate::digest::Digest;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// A boxed stream of blob bytes.
pub type BlobStream = Pin<Box<dyn Stream<Item = crate::Result<Bytes>> + Send>>;

/// Metadata describing a stored blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Digest uniquely identifying the content.
    pub digest: Digest,

    /// Media type of the content, e.g. `application/octet-stream`.
    #[serde(rename = "mediaType")]
    pub media_type: String,

    /// Content length in bytes.
    pub length: u64,
}

/// Resolves a digest to a descriptor without fetching content.
#[async_trait]
pub trait BlobStatter: Send + Sync {
    /// Stat the blob identified by `digest`. A miss is [`crate::Error::NotFound`].
    async fn stat(&self, digest: &Digest) -> crate::Result<Descriptor>;
}

/// Read access to content-addressed blobs.
#[async_trait]
pub trait BlobStore: BlobStatter {
    /// Fetch the full blob content. Intended for small blobs.
    async fn get(&self, digest: &Digest) -> crate::Result<Bytes>;

    /// Open the blob as a byte stream.
    async fn open(&self, digest: &Digest) -> crate::Result<BlobStream>;
}
