//! Configuration schema for gradle-provision
//!
//! Configuration is stored at `~/.config/gradle-provision/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base URL of the Gradle version registry
pub const DEFAULT_VERSIONS_URL: &str = "https://services.gradle.org/versions";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Version registry settings
    pub registry: RegistryConfig,

    /// Distribution cache settings
    pub cache: CacheConfig,

    /// Provisioning layout settings
    pub provision: ProvisionConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Version registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL serving `current`, `nightly`, `all`, ...
    pub base_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_VERSIONS_URL.to_string(),
        }
    }
}

/// Distribution cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Skip the cache entirely
    pub disabled: bool,

    /// Restore from the cache but never save to it
    pub read_only: bool,

    /// Directory holding cache entries (defaults to the local data dir)
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Directory the blob cache stores entries under
    pub fn store_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("gradle-provision")
                .join("cache")
        })
    }
}

/// Provisioning layout configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Override of the provisioning root (installs/ and downloads/ live here)
    pub root: Option<PathBuf>,
}
