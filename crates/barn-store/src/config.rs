// ABOUTME: Configuration for the log engine, with defaults and environment overrides.
// ABOUTME: The one recognized option is the entry count that triggers automatic compaction.

use thiserror::Error;

/// Default number of entries a generation may hold before compaction.
pub const DEFAULT_MAX_ENTRIES_PER_GENERATION: usize = 1000;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BARN_MAX_ENTRIES must be a positive integer, got {0:?}")]
    InvalidMaxEntries(String),
}

/// Log engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Once a mutating command pushes the write cursor past this value, the
    /// store compacts before returning.
    pub max_entries_per_generation: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries_per_generation: DEFAULT_MAX_ENTRIES_PER_GENERATION,
        }
    }
}

impl StoreConfig {
    pub fn with_max_entries(mut self, max_entries_per_generation: usize) -> Self {
        self.max_entries_per_generation = max_entries_per_generation;
        self
    }

    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - BARN_MAX_ENTRIES: entries per generation before compaction (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("BARN_MAX_ENTRIES") {
            Ok(raw) => Self::default().with_max_entries_str(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    fn with_max_entries_str(self, raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(self.with_max_entries(n)),
            _ => Err(ConfigError::InvalidMaxEntries(raw.to_string())),
        }
    }
}
