//! Core domain types and capability contracts for Berth.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Content digests
//! - Manifest structure (layers and history)
//! - Blob descriptors and the statter/store contracts
//! - Namespace, repository and service contracts
//! - Shared configuration types

pub mod blobs;
pub mod config;
pub mod digest;
pub mod error;
pub mod manifest;
pub mod repository;

pub use blobs::{BlobStatter, BlobStore, BlobStream, Descriptor};
pub use config::{PurgeConfig, RegistryConfig, StorageParams};
pub use digest::Digest;
pub use error::{Error, Result};
pub use manifest::{FsLayer, History, SignedManifest};
pub use repository::{
    GlobalScope, ManifestService, Namespace, Repository, Scope, SignatureService,
};
