//! Provisioning entry points
//!
//! [`Provisioner::provision_gradle`] installs an exact or channel version
//! and exposes it on the search path. [`Provisioner::provision_gradle_at_least`]
//! returns any existing Gradle that is new enough, installing the minimum
//! version only when none is.

use crate::cache::{CacheGateway, DirectoryCache, DistributionCache};
use crate::config::{CacheConfig, Config};
use crate::download::{HttpTransport, Transport};
use crate::environment::{group, ActionsEnvironment, RunnerEnvironment};
use crate::error::ProvisionResult;
use crate::install::{Installer, ProvisionLayout};
use crate::probe::{version_is_at_least, GradleProbe, VersionProbe};
use crate::registry::{HttpVersionRegistry, VersionRegistry};
use crate::resolve::{find_release, resolve_version, VersionSpecifier};
use crate::ui::UiContext;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output name under which the resolved version is published
pub const VERSION_OUTPUT: &str = "gradle-version";

/// Production collaborators built from configuration
pub struct Services {
    pub registry: HttpVersionRegistry,
    pub cache: DirectoryCache,
    pub transport: HttpTransport,
    pub probe: GradleProbe,
    pub env: ActionsEnvironment,
    pub cache_config: CacheConfig,
    pub layout: ProvisionLayout,
}

impl Services {
    pub fn from_config(config: &Config, ui: UiContext) -> Self {
        let env = ActionsEnvironment::from_env();
        let layout = ProvisionLayout::resolve(config, &env);
        Self {
            registry: HttpVersionRegistry::new(config.registry.base_url.clone()),
            cache: DirectoryCache::new(config.cache.store_dir()),
            transport: HttpTransport::new(ui),
            probe: GradleProbe,
            env,
            cache_config: config.cache.clone(),
            layout,
        }
    }

    pub fn provisioner(&self) -> Provisioner<'_> {
        Provisioner {
            registry: &self.registry,
            cache: &self.cache,
            transport: &self.transport,
            probe: &self.probe,
            env: &self.env,
            cache_config: &self.cache_config,
            layout: &self.layout,
        }
    }
}

/// Collaborators used for one provisioning call
pub struct Provisioner<'a> {
    pub registry: &'a dyn VersionRegistry,
    pub cache: &'a dyn DistributionCache,
    pub transport: &'a dyn Transport,
    pub probe: &'a dyn VersionProbe,
    pub env: &'a dyn RunnerEnvironment,
    pub cache_config: &'a CacheConfig,
    pub layout: &'a ProvisionLayout,
}

impl<'a> Provisioner<'a> {
    fn installer(&self) -> Installer<'_> {
        Installer::new(
            self.layout,
            self.probe,
            CacheGateway::new(self.cache_config, self.cache, self.transport),
        )
    }

    /// Install the requested version and add it to the search path
    ///
    /// Returns `None` when no version is configured (empty or `wrapper`).
    pub async fn provision_gradle(&self, version: &str) -> ProvisionResult<Option<PathBuf>> {
        let specifier = VersionSpecifier::parse(version);
        if !specifier.is_configured() {
            debug!("No Gradle version configured");
            return Ok(None);
        }

        let info = resolve_version(self.registry, &specifier).await?;
        self.env.set_output(VERSION_OUTPUT, &info.version).await?;

        let executable = self.installer().install(&info).await?;
        if let Some(bin_dir) = executable.parent() {
            self.env.add_path(bin_dir).await?;
        }
        Ok(Some(executable))
    }

    /// Find or install a Gradle executable of at least `minimum_version`
    ///
    /// Gradle on the search path is checked first, then `candidates` in
    /// order. The result is not added to the search path.
    pub async fn provision_gradle_at_least(
        &self,
        minimum_version: &str,
        candidates: &[PathBuf],
    ) -> ProvisionResult<PathBuf> {
        let mut all_candidates = Vec::with_capacity(candidates.len() + 1);
        if let Some(on_path) = self.probe.find_on_path().await {
            all_candidates.push(on_path);
        }
        all_candidates.extend_from_slice(candidates);

        let label = format!("Provision Gradle >= {}", minimum_version);
        group(&label, async {
            for candidate in &all_candidates {
                if self.satisfies(candidate, minimum_version).await {
                    return Ok(candidate.clone());
                }
            }

            let info = find_release(self.registry, minimum_version).await?;
            self.installer().locate_or_download(&info).await
        })
        .await
    }

    async fn satisfies(&self, candidate: &Path, minimum_version: &str) -> bool {
        let Some(version) = self.probe.determine_version(candidate).await else {
            return false;
        };
        if !version_is_at_least(&version, minimum_version) {
            debug!(
                "Gradle {} at {} is older than {}",
                version,
                candidate.display(),
                minimum_version
            );
            return false;
        }

        info!(
            "Gradle version {} is available at {} and >= {}. Not installing.",
            version,
            candidate.display(),
            minimum_version
        );
        true
    }
}
