//! Client pull workflow.

use crate::client::Client;
use crate::object_store::ObjectStore;
use crate::transfer::run_window;
use crate::{Error, Result};
use berth_core::FsLayer;
use futures::StreamExt;
use std::sync::Arc;

/// Pull the image identified by `name` and `tag`, storing its manifest and
/// layers in `object_store`.
///
/// Layer transfers run concurrently within the sliding window
/// ([`crate::LAYER_TRANSFER_WINDOW`]); the first layer failure, in manifest
/// order, cancels the remaining transfers and is returned. The manifest is
/// persisted only after every layer has completed.
pub async fn pull(
    client: Arc<dyn Client>,
    object_store: Arc<dyn ObjectStore>,
    name: &str,
    tag: &str,
) -> Result<()> {
    let manifest = client.get_image_manifest(name, tag).await?;
    tracing::info!(name, tag, layers = manifest.layer_count(), "pulled manifest");

    manifest.validate_shape()?;

    let fs_layers = manifest.fs_layers.clone();
    run_window(fs_layers.len(), |i| {
        let client = client.clone();
        let object_store = object_store.clone();
        let name = name.to_string();
        let fs_layer = fs_layers[i].clone();
        Box::pin(pull_layer(client, object_store, name, fs_layer))
    })
    .await?;

    object_store.write_manifest(name, tag, &manifest).await?;
    Ok(())
}

/// Transfer a single layer into the local store, resuming a partial download
/// when one exists.
async fn pull_layer(
    client: Arc<dyn Client>,
    object_store: Arc<dyn ObjectStore>,
    name: String,
    fs_layer: FsLayer,
) -> Result<()> {
    tracing::info!(layer = %fs_layer.blob_sum, "pulling layer");

    let layer = object_store.layer(&fs_layer.blob_sum).await?;

    let mut writer = match layer.writer().await {
        Ok(writer) => writer,
        Err(Error::LayerAlreadyExists) => {
            tracing::info!(layer = %fs_layer.blob_sum, "layer already exists");
            return Ok(());
        }
        Err(Error::LayerLocked) => {
            tracing::info!(layer = %fs_layer.blob_sum, "layer download in progress, waiting");
            layer.wait().await?;
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let offset = writer.current_size();
    if offset > 0 {
        tracing::info!(
            layer = %fs_layer.blob_sum,
            current_size = offset,
            "layer partially downloaded, resuming"
        );
    }

    let (mut blob, length) = client.get_blob(&name, &fs_layer.blob_sum, offset).await?;
    writer.set_size(offset + length)?;

    while let Some(chunk) = blob.next().await {
        writer.write(chunk?).await?;
    }

    if writer.current_size() != writer.size() {
        return Err(Error::IncompleteLayer {
            expected: writer.size(),
            actual: writer.current_size(),
        });
    }
    writer.close().await
}
