//! Configuration management for gradle-provision

pub mod schema;

pub use schema::{CacheConfig, Config};

use crate::error::{ProvisionError, ProvisionResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const ENV_CACHE_DISABLED: &str = "GRADLE_PROVISION_CACHE_DISABLED";
const ENV_CACHE_READ_ONLY: &str = "GRADLE_PROVISION_CACHE_READ_ONLY";
const ENV_CACHE_DIR: &str = "GRADLE_PROVISION_CACHE_DIR";
const ENV_VERSIONS_URL: &str = "GRADLE_PROVISION_VERSIONS_URL";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradle-provision")
            .join("config.toml")
    }

    /// Load configuration from file (defaults if missing), then apply env overrides
    pub async fn load(&self) -> ProvisionResult<Config> {
        let mut config = if self.config_path.exists() {
            self.load_from_file(&self.config_path).await?
        } else {
            debug!("Config file not found, using defaults");
            Config::default()
        };

        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> ProvisionResult<Config> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            ProvisionError::io(format!("reading config from {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| ProvisionError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `GRADLE_PROVISION_*` overrides on top of file configuration
fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(value) = lookup(ENV_CACHE_DISABLED) {
        config.cache.disabled = is_truthy(&value);
    }
    if let Some(value) = lookup(ENV_CACHE_READ_ONLY) {
        config.cache.read_only = is_truthy(&value);
    }
    if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|v| !v.is_empty()) {
        config.cache.dir = Some(PathBuf::from(dir));
    }
    if let Some(url) = lookup(ENV_VERSIONS_URL).filter(|v| !v.is_empty()) {
        config.registry.base_url = url.trim_end_matches('/').to_string();
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
