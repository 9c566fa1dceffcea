//! Cache-first distribution download
//!
//! Restores a distribution archive from the blob cache when possible,
//! otherwise downloads it and (unless read-only) saves it back. Cache
//! failures are reported through [`handle_cache_failure`] and never fail
//! the download itself.

use crate::cache::backend::DistributionCache;
use crate::config::CacheConfig;
use crate::download::Transport;
use crate::error::{CacheError, ProvisionResult};
use crate::registry::VersionDescriptor;
use std::error::Error as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Cache key for a Gradle distribution
pub fn cache_key(version: &str) -> String {
    format!("gradle-{}", version)
}

/// Report a cache failure without propagating it
///
/// A reserved key means another job is already saving the same
/// distribution, which is expected and only informational.
pub fn handle_cache_failure(error: &CacheError, message: &str) {
    match error {
        CacheError::Reserved { .. } => info!("{}: {}", message, error),
        _ => warn!("{}: {}", message, error),
    }

    let mut source = error.source();
    while let Some(cause) = source {
        debug!("  caused by: {}", cause);
        source = cause.source();
    }
}

/// Ensures a distribution archive exists locally, preferring the cache
pub struct CacheGateway<'a> {
    config: &'a CacheConfig,
    cache: &'a dyn DistributionCache,
    transport: &'a dyn Transport,
}

impl<'a> CacheGateway<'a> {
    pub fn new(
        config: &'a CacheConfig,
        cache: &'a dyn DistributionCache,
        transport: &'a dyn Transport,
    ) -> Self {
        Self {
            config,
            cache,
            transport,
        }
    }

    /// Place the archive for `info` at `download_path`
    pub async fn fetch(&self, info: &VersionDescriptor, download_path: &Path) -> ProvisionResult<()> {
        if self.config.is_disabled() {
            return self.download(info, download_path).await;
        }

        let key = cache_key(&info.version);
        let paths = [download_path.to_path_buf()];

        match self.cache.restore(&paths, &key).await {
            Ok(Some(_)) if download_path.exists() => {
                info!(
                    "Restored Gradle distribution {} from cache to {}",
                    key,
                    download_path.display()
                );
                return Ok(());
            }
            Ok(Some(_)) => handle_cache_failure(
                &CacheError::Unavailable(format!(
                    "entry {} did not restore {}",
                    key,
                    download_path.display()
                )),
                &format!("Restore Gradle distribution {} failed", info.version),
            ),
            Ok(None) => {}
            Err(e) => handle_cache_failure(
                &e,
                &format!("Restore Gradle distribution {} failed", info.version),
            ),
        }

        info!(
            "Gradle distribution {} not found in cache. Will download.",
            info.version
        );
        self.download(info, download_path).await?;

        if !self.config.is_read_only() {
            self.save(&paths, &key, &info.version).await;
        }
        Ok(())
    }

    async fn download(&self, info: &VersionDescriptor, download_path: &Path) -> ProvisionResult<()> {
        self.transport.download(&info.download_url, download_path).await
    }

    async fn save(&self, paths: &[PathBuf], key: &str, version: &str) {
        match self.cache.save(paths, key).await {
            Ok(()) => debug!("Saved Gradle distribution {} to cache", key),
            Err(e) => handle_cache_failure(
                &e,
                &format!("Save Gradle distribution {} failed", version),
            ),
        }
    }
}
