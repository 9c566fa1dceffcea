//! Version specifier resolution
//!
//! Maps what the user asked for (`current`, `release-candidate`, `8.5`, ...)
//! onto a concrete [`VersionDescriptor`] using a [`VersionRegistry`].

use crate::error::{ProvisionError, ProvisionResult};
use crate::registry::{Channel, VersionDescriptor, VersionRegistry};
use tracing::{info, warn};

/// Sentinel meaning "use the project's Gradle wrapper"
pub const WRAPPER: &str = "wrapper";

/// A parsed user version request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpecifier {
    /// Nothing to provision (empty input or `wrapper`)
    NotConfigured,
    /// A symbolic channel resolved at call time
    Channel(Channel),
    /// An exact release such as `8.5` or `8.6-rc-1`
    Exact(String),
}

impl VersionSpecifier {
    /// Parse raw user input; the deprecated `rc` alias logs a warning
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "" | WRAPPER => Self::NotConfigured,
            "current" => Self::Channel(Channel::Current),
            "rc" => {
                warn!(
                    "Specifying gradle-version 'rc' has been deprecated. Use 'release-candidate' instead."
                );
                Self::Channel(Channel::ReleaseCandidate)
            }
            "release-candidate" => Self::Channel(Channel::ReleaseCandidate),
            "nightly" => Self::Channel(Channel::Nightly),
            "release-nightly" => Self::Channel(Channel::ReleaseNightly),
            other => Self::Exact(other.to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::NotConfigured)
    }
}

/// Resolve a specifier against the registry
pub async fn resolve_version(
    registry: &dyn VersionRegistry,
    specifier: &VersionSpecifier,
) -> ProvisionResult<VersionDescriptor> {
    match specifier {
        VersionSpecifier::NotConfigured => Err(ProvisionError::Internal(
            "cannot resolve an unconfigured Gradle version".to_string(),
        )),
        VersionSpecifier::Channel(Channel::ReleaseCandidate) => {
            release_candidate(registry).await
        }
        VersionSpecifier::Channel(channel) => registry.fetch_channel(*channel).await,
        VersionSpecifier::Exact(version) => find_release(registry, version).await,
    }
}

/// Resolve the release candidate, falling back to `current` when none is active
async fn release_candidate(registry: &dyn VersionRegistry) -> ProvisionResult<VersionDescriptor> {
    let info = registry.fetch_channel(Channel::ReleaseCandidate).await?;
    if info.is_complete() {
        return Ok(info);
    }

    info!("No current release-candidate found, will fallback to current");
    registry.fetch_channel(Channel::Current).await
}

/// Look up an exact version in the full registry listing
pub async fn find_release(
    registry: &dyn VersionRegistry,
    version: &str,
) -> ProvisionResult<VersionDescriptor> {
    registry
        .fetch_all()
        .await?
        .into_iter()
        .find(|entry| entry.version == version)
        .ok_or_else(|| ProvisionError::VersionNotFound {
            version: version.to_string(),
        })
}
