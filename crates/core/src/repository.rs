//! Namespace, repository and service contracts.
//!
//! These traits are the capability surface the client and the server-side
//! registry couple against. A `Namespace` hands out `Repository` references;
//! a `Repository` aggregates the manifest, blob and signature services for
//! one named collection of images.

use crate::blobs::BlobStore;
use crate::digest::Digest;
use crate::manifest::SignedManifest;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// A predicate over repository names, deciding which names a namespace covers.
pub trait Scope: Send + Sync {
    /// Returns true if the name belongs to the namespace.
    fn contains(&self, name: &str) -> bool;
}

/// The full namespace scope, containing all names.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalScope;

impl Scope for GlobalScope {
    fn contains(&self, _name: &str) -> bool {
        true
    }
}

/// A collection of repositories, addressable by name.
#[async_trait]
pub trait Namespace: Send + Sync {
    /// The names covered by this namespace.
    fn scope(&self) -> &dyn Scope;

    /// Return a reference to the named repository. The registry may or may
    /// not have the repository; a handle is always returned and existence is
    /// a property of subsequent operations.
    async fn repository(&self, name: &str) -> crate::Result<Arc<dyn Repository>>;
}

/// A named collection of manifests, blobs and signatures.
pub trait Repository: Send + Sync {
    /// The name of the repository.
    fn name(&self) -> &str;

    /// This repository's manifest service.
    fn manifests(&self) -> Arc<dyn ManifestService>;

    /// This repository's blob store.
    fn blobs(&self) -> Arc<dyn BlobStore>;

    /// This repository's signature service.
    fn signatures(&self) -> Arc<dyn SignatureService>;
}

/// Operations on image manifests.
#[async_trait]
pub trait ManifestService: Send + Sync {
    /// Returns true if a manifest with the given digest exists.
    async fn exists(&self, digest: &Digest) -> crate::Result<bool>;

    /// Retrieve the manifest identified by the digest.
    async fn get(&self, digest: &Digest) -> crate::Result<SignedManifest>;

    /// Create or update a manifest.
    async fn put(&self, manifest: &SignedManifest) -> crate::Result<()>;

    /// Remove the manifest, if it exists. Back-ends may answer
    /// [`crate::Error::Unsupported`].
    async fn delete(&self, digest: &Digest) -> crate::Result<()>;

    /// List the tags under the repository.
    ///
    /// TODO(pagination): grow a paged variant so large repositories do not
    /// materialize every tag per call.
    async fn tags(&self) -> crate::Result<Vec<String>>;

    /// Returns true if a manifest exists under the given tag.
    async fn exists_by_tag(&self, tag: &str) -> crate::Result<bool>;

    /// Retrieve the manifest under the given tag.
    async fn get_by_tag(&self, tag: &str) -> crate::Result<SignedManifest>;
}

/// Operations on manifest signatures.
#[async_trait]
pub trait SignatureService: Send + Sync {
    /// Retrieve all signature blobs for the digest. Order is unspecified.
    async fn get(&self, digest: &Digest) -> crate::Result<Vec<Bytes>>;

    /// Store additional signatures for the digest. Additive.
    async fn put(&self, digest: &Digest, signatures: &[Bytes]) -> crate::Result<()>;
}
