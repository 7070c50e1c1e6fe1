//! Client push workflow.

use crate::client::Client;
use crate::object_store::ObjectStore;
use crate::transfer::run_window;
use crate::{Error, Result};
use berth_core::FsLayer;
use std::sync::Arc;

/// Push the image identified by `name` and `tag` from `object_store` to the
/// remote registry.
///
/// Layer uploads run concurrently within the sliding window; the first layer
/// failure, in manifest order, cancels the remaining uploads and is returned.
/// Once push returns an error, uploads already in flight are best-effort.
/// The manifest is uploaded only after every layer is accounted for.
pub async fn push(
    client: Arc<dyn Client>,
    object_store: Arc<dyn ObjectStore>,
    name: &str,
    tag: &str,
) -> Result<()> {
    let manifest = match object_store.manifest(name, tag).await {
        Ok(manifest) => manifest,
        Err(err) => {
            tracing::info!(name, tag, "no image found locally");
            return Err(err);
        }
    };

    let fs_layers = manifest.fs_layers.clone();
    run_window(fs_layers.len(), |i| {
        let client = client.clone();
        let object_store = object_store.clone();
        let name = name.to_string();
        let fs_layer = fs_layers[i].clone();
        Box::pin(push_layer(client, object_store, name, fs_layer))
    })
    .await?;

    client.put_image_manifest(name, tag, &manifest).await?;
    Ok(())
}

/// Upload a single layer, skipping blobs the remote already has.
async fn push_layer(
    client: Arc<dyn Client>,
    object_store: Arc<dyn ObjectStore>,
    name: String,
    fs_layer: FsLayer,
) -> Result<()> {
    tracing::info!(layer = %fs_layer.blob_sum, "pushing layer");

    let layer = object_store.layer(&fs_layer.blob_sum).await?;
    let reader = layer.reader().await?;

    if reader.current_size() != reader.size() {
        tracing::warn!(
            layer = %fs_layer.blob_sum,
            current_size = reader.current_size(),
            size = reader.size(),
            "local layer incomplete"
        );
        return Err(Error::IncompleteLayer {
            expected: reader.size(),
            actual: reader.current_size(),
        });
    }

    if client.blob_length(&name, &fs_layer.blob_sum).await?.is_some() {
        tracing::info!(layer = %fs_layer.blob_sum, "layer already exists remotely");
        return Ok(());
    }

    let location = client.initiate_blob_upload(&name).await?;
    let length = reader.current_size();
    client
        .upload_blob(&location, reader.into_stream(), length, &fs_layer.blob_sum)
        .await
}
