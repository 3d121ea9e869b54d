// ABOUTME: Configuration loading for the barn binary.
// ABOUTME: Reads the data file, namespace, and compaction threshold from environment variables.

use std::path::PathBuf;

use barn_store::{ConfigError, StoreConfig};

use crate::DEFAULT_NAMESPACE;

/// Binary configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct BarnConfig {
    pub data: PathBuf,
    pub namespace: String,
    pub store: StoreConfig,
}

impl BarnConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - BARN_DATA: JSON data file backing the store (default: ./barn.json)
    /// - BARN_NAMESPACE: key prefix within the data file (default: BARN)
    /// - BARN_MAX_ENTRIES: entries per generation before compaction (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let data = std::env::var("BARN_DATA")
            .ok()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("barn.json"));

        let namespace = std::env::var("BARN_NAMESPACE")
            .ok()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let store = StoreConfig::from_env()?;

        Ok(Self {
            data,
            namespace,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_loads_defaults_and_overrides() {
        // SAFETY: test-only code; this is the only test touching these variables
        unsafe {
            std::env::remove_var("BARN_DATA");
            std::env::remove_var("BARN_NAMESPACE");
            std::env::remove_var("BARN_MAX_ENTRIES");
        }

        let config = BarnConfig::from_env().unwrap();
        assert_eq!(config.data, PathBuf::from("barn.json"));
        assert_eq!(config.namespace, "BARN");
        assert_eq!(config.store, StoreConfig::default());

        // SAFETY: test-only code; this is the only test touching these variables
        unsafe {
            std::env::set_var("BARN_DATA", "/tmp/other.json");
            std::env::set_var("BARN_NAMESPACE", "app");
            std::env::set_var("BARN_MAX_ENTRIES", "25");
        }

        let config = BarnConfig::from_env();

        // SAFETY: test-only code; this is the only test touching these variables
        unsafe {
            std::env::remove_var("BARN_DATA");
            std::env::remove_var("BARN_NAMESPACE");
            std::env::remove_var("BARN_MAX_ENTRIES");
        }

        let config = config.unwrap();
        assert_eq!(config.data, PathBuf::from("/tmp/other.json"));
        assert_eq!(config.namespace, "app");
        assert_eq!(config.store.max_entries_per_generation, 25);
    }
}
