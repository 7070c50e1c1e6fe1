//! Content-addressed path layout.
//!
//! All registry state lives under `/registry`:
//!
//! ```text
//! /registry/blobs/<algorithm>/<xx>/<encoded>/data        blob content
//! /registry/repositories/<name>/...                      per-repository state
//! /registry/repositories/<name>/_uploads/<uuid>/         upload session
//! /registry/repositories/<name>/_uploads/<uuid>/startedat
//! ```
//!
//! `<xx>` is the first two characters of the encoded digest, fanning blob
//! directories out so no single directory grows unboundedly.

use berth_core::Digest;
use berth_driver::{DriverError, DriverResult, PATH_REGEX};
use uuid::Uuid;

const ROOT: &str = "/registry";

/// Root of the per-repository subtree. The upload purger walks from here.
pub fn repositories_root() -> String {
    format!("{ROOT}/repositories")
}

/// Driver path holding the content of the given blob.
///
/// Digests whose components violate the path grammar cannot be mapped and
/// return [`DriverError::InvalidPath`].
pub fn blob_data_path(digest: &Digest) -> DriverResult<String> {
    let encoded = digest.encoded();
    if encoded.len() < 2 {
        return Err(DriverError::InvalidPath(digest.to_string()));
    }
    let path = format!(
        "{ROOT}/blobs/{}/{}/{}/data",
        digest.algorithm(),
        &encoded[..2],
        encoded
    );
    if !PATH_REGEX.is_match(&path) {
        return Err(DriverError::InvalidPath(digest.to_string()));
    }
    Ok(path)
}

/// Containing directory of an upload session.
pub fn upload_dir_path(name: &str, upload_id: &Uuid) -> String {
    format!("{}/{name}/_uploads/{upload_id}", repositories_root())
}

/// The `startedat` timestamp file of an upload session.
pub fn started_at_path(name: &str, upload_id: &Uuid) -> String {
    format!("{}/startedat", upload_dir_path(name, upload_id))
}
