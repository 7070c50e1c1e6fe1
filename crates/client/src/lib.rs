//! Client-side transfer engine for Berth.
//!
//! The heart of the library: a windowed, cancellable parallel layer transfer
//! engine ([`pull`] and [`push`]) on top of a local [`ObjectStore`] of
//! manifests and content-addressed layers, talking to a remote registry
//! through the [`Client`] contract.

pub mod client;
pub mod error;
pub mod memory;
pub mod object_store;
pub mod pull;
pub mod push;
mod transfer;

pub use client::{BlobStream, Client};
pub use error::{Error, Result};
pub use memory::{MemoryLayer, MemoryObjectStore};
pub use object_store::{Layer, LayerReader, LayerWriter, ObjectStore};
pub use pull::pull;
pub use push::push;
pub use transfer::LAYER_TRANSFER_WINDOW;
