pub mod fixtures;
pub mod mock_client;

#[allow(unused_imports)]
pub use fixtures::{complete_layer, layer_contents, make_manifest, partial_layer};
#[allow(unused_imports)]
pub use mock_client::MockClient;
