//! The remote registry client contract.

use crate::Result;
use async_trait::async_trait;
use berth_core::{Digest, SignedManifest};
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// A boxed stream of blob bytes.
pub type BlobStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Operations a remote registry must offer for pull and push.
///
/// The wire protocol behind these operations is out of scope; the transfer
/// engine couples only against this surface.
#[async_trait]
pub trait Client: Send + Sync {
    /// Fetch the signed manifest stored under `name` and `tag`.
    async fn get_image_manifest(&self, name: &str, tag: &str) -> Result<SignedManifest>;

    /// Store a signed manifest under `name` and `tag`.
    async fn put_image_manifest(
        &self,
        name: &str,
        tag: &str,
        manifest: &SignedManifest,
    ) -> Result<()>;

    /// Fetch the blob identified by `digest`, starting at `offset` to resume
    /// a previous transfer. Returns the stream and the number of bytes
    /// remaining from `offset` to the end of the blob.
    async fn get_blob(
        &self,
        name: &str,
        digest: &Digest,
        offset: u64,
    ) -> Result<(BlobStream, u64)>;

    /// The length of the blob if the remote already has it, `None` otherwise.
    async fn blob_length(&self, name: &str, digest: &Digest) -> Result<Option<u64>>;

    /// Start a blob upload, returning the upload location.
    async fn initiate_blob_upload(&self, name: &str) -> Result<String>;

    /// Stream `length` bytes of blob content to `location` and seal the
    /// upload with the expected digest.
    async fn upload_blob(
        &self,
        location: &str,
        blob: BlobStream,
        length: u64,
        digest: &Digest,
    ) -> Result<()>;
}
