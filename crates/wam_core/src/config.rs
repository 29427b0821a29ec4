//! Configuration for a WAM repository, read from `.wam/config.toml`.

use crate::error::{Result, WamError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file inside `.wam`.
pub const CONFIG_FILE: &str = "config.toml";

/// Repository configuration. Every section may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Storage-related configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Capture ingestion configuration.
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from `wam_dir`, falling back to defaults when the
    /// file is missing.
    pub fn load(wam_dir: &Path) -> Result<Self> {
        let path = wam_dir.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| WamError::ConfigError(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| WamError::ConfigError(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration into `wam_dir`.
    pub fn save(&self, wam_dir: &Path) -> Result<()> {
        let path = wam_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| WamError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| WamError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// Which key-value backend holds the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Single-file redb database.
    #[default]
    Redb,
    /// Process memory; nothing survives a restart.
    Memory,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind (default: redb).
    pub backend: Backend,

    /// Database file, relative to `.wam` (default: `store.redb`).
    pub file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Redb,
            file: "store.redb".to_string(),
        }
    }
}

/// Capture ingestion configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Worker threads replaying a capture feed (default: 4).
    pub workers: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset (default: "warn").
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}
