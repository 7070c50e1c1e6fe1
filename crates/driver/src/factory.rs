//! Process-wide storage driver factory registry.
//!
//! Drivers call [`register`] from their initialization path to make
//! themselves available by name; [`create`] instantiates a registered driver
//! from an opaque parameter map. The table is populated during process
//! startup and read-only afterwards.

use crate::{DriverError, DriverResult, StorageDriver};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

/// Factory for creating [`StorageDriver`] instances.
#[async_trait]
pub trait StorageDriverFactory: Send + Sync {
    /// Create a new driver with the given parameters. Parameters vary by
    /// driver and may be ignored.
    async fn create(
        &self,
        parameters: &HashMap<String, serde_json::Value>,
    ) -> DriverResult<Box<dyn StorageDriver>>;
}

static FACTORIES: LazyLock<RwLock<HashMap<String, Arc<dyn StorageDriverFactory>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Make a storage driver available by the provided name.
///
/// Registration is initialization-time only; registering the same name twice
/// is a programming error and panics.
pub fn register(name: &str, factory: Arc<dyn StorageDriverFactory>) {
    let mut factories = FACTORIES
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if factories.contains_key(name) {
        panic!("storage driver factory named {name} already registered");
    }
    factories.insert(name.to_string(), factory);
}

/// Create a new [`StorageDriver`] with the given name and parameters.
///
/// The factory must have been registered under `name`; otherwise
/// [`DriverError::InvalidStorageDriver`] is returned. Parameter keys must
/// consist of lowercase letters and digits only.
pub async fn create(
    name: &str,
    parameters: &HashMap<String, serde_json::Value>,
) -> DriverResult<Box<dyn StorageDriver>> {
    for key in parameters.keys() {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(DriverError::InvalidParameter(key.clone()));
        }
    }

    let factory = {
        let factories = FACTORIES
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        factories
            .get(name)
            .cloned()
            .ok_or_else(|| DriverError::InvalidStorageDriver(name.to_string()))?
    };

    factory.create(parameters).await
}
