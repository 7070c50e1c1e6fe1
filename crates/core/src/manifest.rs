//! Image manifest model.

use crate::digest::Digest;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A reference to a layer blob within a manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsLayer {
    /// Digest of the referenced layer blob.
    #[serde(rename = "blobSum")]
    pub blob_sum: Digest,
}

/// One history entry, parallel to the layer list.
///
/// The content is an opaque serialized image configuration; Berth only
/// requires the list to run parallel to `fs_layers`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    #[serde(rename = "v1Compatibility")]
    pub v1_compatibility: String,
}

/// A signed description of an image: name, tag, ordered layer references and
/// their parallel history, plus the detached signature bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedManifest {
    pub name: String,
    pub tag: String,
    #[serde(rename = "fsLayers")]
    pub fs_layers: Vec<FsLayer>,
    pub history: Vec<History>,
    /// Raw signature bytes, carried opaquely. Verification is out of scope.
    #[serde(skip)]
    pub signature: Bytes,
}

impl SignedManifest {
    /// Validate the manifest shape: the layer and history lists must run
    /// parallel and the manifest must reference at least one layer.
    pub fn validate_shape(&self) -> crate::Result<()> {
        if self.fs_layers.len() != self.history.len() {
            return Err(crate::Error::ManifestShape {
                layers: self.fs_layers.len(),
                history: self.history.len(),
            });
        }
        if self.fs_layers.is_empty() {
            return Err(crate::Error::EmptyManifest);
        }
        Ok(())
    }

    /// Number of layers referenced by this manifest.
    pub fn layer_count(&self) -> usize {
        self.fs_layers.len()
    }
}
