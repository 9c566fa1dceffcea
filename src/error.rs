//! Error types for gradle-provision
//!
//! All modules use `ProvisionResult<T>` as their return type. Blob cache
//! failures have their own `CacheError` so the cache gateway can contain
//! them without ever turning them into a provisioning failure.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// All errors that can abort provisioning
#[derive(Error, Debug)]
pub enum ProvisionError {
    // Resolution errors
    #[error("Gradle version {version} does not exist")]
    VersionNotFound { version: String },

    #[error("Invalid Gradle version '{version}': {reason}")]
    VersionInvalid { version: String, reason: String },

    // Transport errors
    #[error("Failed to read version registry {url}: {reason}")]
    Registry { url: String, reason: String },

    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    // Installation errors
    #[error("Failed to extract {path}: {reason}")]
    Archive { path: PathBuf, reason: String },

    #[error("Gradle executable not found at {0}")]
    ExecutableMissing(PathBuf),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProvisionError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a registry transport error
    pub fn registry(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Registry {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a download transport error
    pub fn download(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Download {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::VersionNotFound { .. } => {
                Some("See https://gradle.org/releases for available versions")
            }
            Self::Registry { .. } => Some("Check network access to services.gradle.org"),
            Self::ConfigInvalid { .. } => Some("Run: gradle-provision config path"),
            _ => None,
        }
    }
}

/// Errors reported by a blob cache backend
#[derive(Error, Debug)]
pub enum CacheError {
    /// Another job already holds (or finished) an entry for this key
    #[error("Cache entry {key} is already reserved")]
    Reserved { key: String },

    #[error("Cache service unavailable: {0}")]
    Unavailable(String),

    #[error("Cache IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Create a cache IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
