//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level registry configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Storage driver selection and parameters.
    pub storage: StorageParams,
    /// Upload purge schedule.
    #[serde(default)]
    pub purge: PurgeConfig,
}

impl RegistryConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        self.storage.validate()?;
        self.purge.validate()
    }
}

/// Storage driver selection: the registered driver name plus an opaque
/// parameter map handed to the driver factory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageParams {
    /// Registered driver name, e.g. "inmemory" or "filesystem".
    pub driver: String,
    /// Driver-specific parameters. Keys must be lowercase alphanumerics.
    #[serde(default)]
    pub parameters: HashMap<String, serde_json::Value>,
}

impl StorageParams {
    /// Validate the driver name and parameter keys.
    pub fn validate(&self) -> crate::Result<()> {
        if self.driver.is_empty() {
            return Err(crate::Error::Config("storage driver name is empty".into()));
        }
        for key in self.parameters.keys() {
            if !key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            {
                return Err(crate::Error::Config(format!(
                    "parameter key must be lowercase alphanumeric: {key}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for StorageParams {
    fn default() -> Self {
        Self {
            driver: "inmemory".to_string(),
            parameters: HashMap::new(),
        }
    }
}

/// Upload purge schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurgeConfig {
    /// Whether the periodic purger runs at all.
    #[serde(default = "default_purge_enabled")]
    pub enabled: bool,
    /// Uploads older than this many hours are eligible for deletion.
    #[serde(default = "default_purge_age_hours")]
    pub age_hours: u64,
    /// Seconds between purge rounds.
    #[serde(default = "default_purge_interval_secs")]
    pub interval_secs: u64,
    /// Report eligible uploads without deleting them.
    #[serde(default)]
    pub dry_run: bool,
}

impl PurgeConfig {
    /// Validate the purge schedule.
    pub fn validate(&self) -> crate::Result<()> {
        if self.enabled && self.age_hours == 0 {
            return Err(crate::Error::Config("purge age must be non-zero".into()));
        }
        if self.enabled && self.interval_secs == 0 {
            return Err(crate::Error::Config(
                "purge interval must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_purge_enabled() -> bool {
    true
}

fn default_purge_age_hours() -> u64 {
    168 // one week
}

fn default_purge_interval_secs() -> u64 {
    86_400
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            enabled: default_purge_enabled(),
            age_hours: default_purge_age_hours(),
            interval_secs: default_purge_interval_secs(),
            dry_run: false,
        }
    }
}
