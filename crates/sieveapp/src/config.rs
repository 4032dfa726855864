//! # Configuration
//!
//! Engine settings are managed by [`confique`], which handles layered loading
//! from a TOML file and environment variables.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `SIEVE_STORAGE_KEY`, `SIEVE_PERSIST_STATE`, `SIEVE_DEBOUNCE_MS`.
//! 2. **Config file**: `sieve.toml` (or whatever path the caller passes in).
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `storage_key` | `filter-state` | Key the filter state is stored under |
//! | `persist_state` | `true` | Mirror values and presets to the store |
//! | `debounce_ms` | `0` | Per-field debounce window for `set_filter_value` |
//!
//! These are the serializable half of
//! [`EngineOptions`](crate::engine::EngineOptions); the comparison function
//! and clock are attached in code.

use std::path::Path;
use std::time::Duration;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

pub const DEFAULT_STORAGE_KEY: &str = "filter-state";

/// Engine settings, stored in `sieve.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SieveConfig {
    /// Key under which `{values, presets}` are persisted.
    #[config(env = "SIEVE_STORAGE_KEY", default = "filter-state")]
    pub storage_key: String,

    /// Whether filter values and presets are written to the store.
    #[config(env = "SIEVE_PERSIST_STATE", default = true)]
    pub persist_state: bool,

    /// Debounce window in milliseconds. Zero applies edits immediately.
    #[config(env = "SIEVE_DEBOUNCE_MS", default = 0)]
    pub debounce_ms: u64,
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persist_state: true,
            debounce_ms: 0,
        }
    }
}

impl SieveConfig {
    /// Load configuration from the environment, then `path` if given, then defaults.
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| SieveError::Config(e.to_string()))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Storage key with surrounding whitespace removed, falling back to the default.
    pub fn storage_key(&self) -> &str {
        let key = self.storage_key.trim();
        if key.is_empty() {
            DEFAULT_STORAGE_KEY
        } else {
            key
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = SieveConfig::default();
        assert_eq!(config.storage_key, "filter-state");
        assert!(config.persist_state);
        assert_eq!(config.debounce(), Duration::ZERO);
    }

    #[test]
    fn test_blank_storage_key_falls_back() {
        let config = SieveConfig {
            storage_key: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.storage_key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_storage_key_is_trimmed() {
        let config = SieveConfig {
            storage_key: " schools-filters ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.storage_key(), "schools-filters");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sieve.toml");
        fs::write(
            &path,
            "storage_key = \"coaches\"\npersist_state = false\ndebounce_ms = 250\n",
        )
        .unwrap();

        let config = SieveConfig::load(Some(&path)).unwrap();
        assert_eq!(config.storage_key, "coaches");
        assert!(!config.persist_state);
        assert_eq!(config.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SieveConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = SieveConfig {
            storage_key: "offers".to_string(),
            persist_state: true,
            debounce_ms: 75,
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: SieveConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
