//! Blob cache backends
//!
//! A cache backend stores a set of files under a key and can later put
//! them back at the same paths. The gateway treats every backend as
//! best-effort: errors are reported, never propagated.

use crate::error::CacheError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Keyed blob storage for downloaded distributions
#[async_trait]
pub trait DistributionCache: Send + Sync {
    /// Restore `paths` saved under `key`; returns the matched key on a hit
    async fn restore(&self, paths: &[PathBuf], key: &str) -> Result<Option<String>, CacheError>;

    /// Save `paths` under `key`
    async fn save(&self, paths: &[PathBuf], key: &str) -> Result<(), CacheError>;
}

const MANIFEST: &str = "entry.json";

/// Manifest describing one cache entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub saved_at: DateTime<Utc>,
    pub files: Vec<CachedFile>,
}

/// A single file inside a cache entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedFile {
    /// Where the file lives when restored
    pub path: PathBuf,
    /// Blob name inside the entry directory
    pub blob: String,
}

/// Cache backend storing entries in a (possibly shared) directory
///
/// Layout: `<root>/<key>/entry.json` plus one blob per saved file.
/// Entries are written to a staging directory and renamed into place,
/// so a reader never sees a half-written entry.
pub struct DirectoryCache {
    root: PathBuf,
}

impl DirectoryCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.root.join(key.replace(['/', '\\'], "_"))
    }

    async fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let manifest = self.entry_dir(key).join(MANIFEST);
        if !manifest.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&manifest)
            .await
            .map_err(|e| CacheError::io(format!("reading {}", manifest.display()), e))?;
        let entry = serde_json::from_str(&content).map_err(|e| {
            CacheError::Unavailable(format!("corrupt manifest {}: {}", manifest.display(), e))
        })?;
        Ok(Some(entry))
    }
}

#[async_trait]
impl DistributionCache for DirectoryCache {
    async fn restore(&self, paths: &[PathBuf], key: &str) -> Result<Option<String>, CacheError> {
        let Some(entry) = self.read_entry(key).await? else {
            debug!("No cache entry for {}", key);
            return Ok(None);
        };

        // Every requested path must be in the entry, otherwise it is a miss
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match entry.files.iter().find(|f| &f.path == path) {
                Some(file) => files.push(file),
                None => {
                    debug!(
                        "Cache entry {} does not hold {}",
                        key,
                        path.display()
                    );
                    return Ok(None);
                }
            }
        }

        let entry_dir = self.entry_dir(key);
        for file in files {
            if let Some(parent) = file.path.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| CacheError::io(format!("creating {}", parent.display()), e))?;
            }
            fs::copy(entry_dir.join(&file.blob), &file.path)
                .await
                .map_err(|e| CacheError::io(format!("restoring {}", file.path.display()), e))?;
        }

        Ok(Some(entry.key))
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> Result<(), CacheError> {
        let entry_dir = self.entry_dir(key);
        if entry_dir.exists() {
            return Err(CacheError::Reserved {
                key: key.to_string(),
            });
        }

        let staging = self
            .root
            .join(format!(".staging-{}-{}", std::process::id(), Utc::now().timestamp_millis()));
        fs::create_dir_all(&staging)
            .await
            .map_err(|e| CacheError::io(format!("creating {}", staging.display()), e))?;

        if let Err(e) = write_entry(&staging, paths, key).await {
            let _ = fs::remove_dir_all(&staging).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&staging, &entry_dir).await {
            let _ = fs::remove_dir_all(&staging).await;
            if entry_dir.exists() {
                return Err(CacheError::Reserved {
                    key: key.to_string(),
                });
            }
            return Err(CacheError::io(format!("publishing cache entry {}", key), e));
        }

        debug!("Saved cache entry {} to {}", key, entry_dir.display());
        Ok(())
    }
}

/// Copy `paths` into `dir` and write the manifest next to them
async fn write_entry(dir: &Path, paths: &[PathBuf], key: &str) -> Result<(), CacheError> {
    let mut files = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "blob".to_string());
        let blob = format!("{}-{}", index, name);
        fs::copy(path, dir.join(&blob))
            .await
            .map_err(|e| CacheError::io(format!("saving {}", path.display()), e))?;
        files.push(CachedFile {
            path: path.clone(),
            blob,
        });
    }

    let entry = CacheEntry {
        key: key.to_string(),
        saved_at: Utc::now(),
        files,
    };
    let manifest = serde_json::to_string_pretty(&entry)
        .map_err(|e| CacheError::Unavailable(format!("encoding manifest: {}", e)))?;
    fs::write(dir.join(MANIFEST), manifest)
        .await
        .map_err(|e| CacheError::io("writing cache manifest", e))
}
