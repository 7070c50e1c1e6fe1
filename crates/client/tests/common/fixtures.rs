use berth_client::ObjectStore;
use berth_core::{Digest, FsLayer, History, SignedManifest};
use bytes::Bytes;

/// Distinct per-layer contents for an image with `count` layers.
pub fn layer_contents(count: usize) -> Vec<Bytes> {
    (0..count)
        .map(|i| Bytes::from(format!("layer {i} contents").into_bytes()))
        .collect()
}

/// A well-formed manifest referencing the given layer contents by digest.
pub fn make_manifest(name: &str, tag: &str, contents: &[Bytes]) -> SignedManifest {
    SignedManifest {
        name: name.to_string(),
        tag: tag.to_string(),
        fs_layers: contents
            .iter()
            .map(|bytes| FsLayer {
                blob_sum: Digest::from_content(bytes),
            })
            .collect(),
        history: contents
            .iter()
            .map(|_| History {
                v1_compatibility: "{}".to_string(),
            })
            .collect(),
        signature: Bytes::from_static(b"test signature"),
    }
}

/// Write a complete layer into the store.
pub async fn complete_layer(store: &dyn ObjectStore, contents: &Bytes) {
    let digest = Digest::from_content(contents);
    let layer = store.layer(&digest).await.unwrap();
    let mut writer = layer.writer().await.unwrap();
    writer.set_size(contents.len() as u64).unwrap();
    writer.write(contents.clone()).await.unwrap();
    writer.close().await.unwrap();
}

/// Write only the first `prefix` bytes of a layer, leaving it resumable.
pub async fn partial_layer(store: &dyn ObjectStore, contents: &Bytes, prefix: usize) {
    let digest = Digest::from_content(contents);
    let layer = store.layer(&digest).await.unwrap();
    let mut writer = layer.writer().await.unwrap();
    writer.set_size(contents.len() as u64).unwrap();
    writer.write(contents.slice(..prefix)).await.unwrap();
    writer.close().await.unwrap();
}
