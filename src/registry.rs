//! Gradle version registry client
//!
//! Reads version descriptors from the `services.gradle.org/versions`
//! metadata service. Channel endpoints return a single descriptor whose
//! fields are empty when the channel has no active release.

use crate::error::{ProvisionError, ProvisionResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A concrete Gradle release and where to fetch it from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionDescriptor {
    pub version: String,
    pub download_url: String,
}

impl VersionDescriptor {
    pub fn new(version: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            download_url: download_url.into(),
        }
    }

    /// Whether the registry actually named a release
    pub fn is_complete(&self) -> bool {
        !self.version.is_empty() && !self.download_url.is_empty()
    }
}

/// Moving version selectors served by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Current,
    ReleaseCandidate,
    Nightly,
    ReleaseNightly,
}

impl Channel {
    /// Endpoint path below the registry base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::ReleaseCandidate => "release-candidate",
            Self::Nightly => "nightly",
            Self::ReleaseNightly => "release-nightly",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Read-only access to version metadata
#[async_trait]
pub trait VersionRegistry: Send + Sync {
    /// Fetch the descriptor a channel currently points at
    async fn fetch_channel(&self, channel: Channel) -> ProvisionResult<VersionDescriptor>;

    /// Fetch every known release
    async fn fetch_all(&self) -> ProvisionResult<Vec<VersionDescriptor>>;
}

/// Registry client speaking HTTP to the Gradle services endpoint
pub struct HttpVersionRegistry {
    base_url: String,
}

impl HttpVersionRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T>(&self, path: &str) -> ProvisionResult<T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let url = self.url(path);
        debug!("Fetching {}", url);

        tokio::task::spawn_blocking(move || {
            let response = ureq::get(&url)
                .header("User-Agent", concat!("gradle-provision/", env!("CARGO_PKG_VERSION")))
                .call()
                .map_err(|e| ProvisionError::registry(&url, e))?;
            let reader = response.into_body().into_reader();
            serde_json::from_reader(reader).map_err(|e| ProvisionError::registry(&url, e))
        })
        .await
        .map_err(|e| ProvisionError::Internal(format!("registry task failed: {}", e)))?
    }
}

#[async_trait]
impl VersionRegistry for HttpVersionRegistry {
    async fn fetch_channel(&self, channel: Channel) -> ProvisionResult<VersionDescriptor> {
        self.get_json(channel.path()).await
    }

    async fn fetch_all(&self) -> ProvisionResult<Vec<VersionDescriptor>> {
        self.get_json("all").await
    }
}
