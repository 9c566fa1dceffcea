//! Runner environment
//!
//! Process-wide effects of provisioning (search path updates, published
//! outputs, the runner's temp directory) go through [`RunnerEnvironment`]
//! so the installer and resolver never touch globals directly.
//!
//! - GitHub Actions: `$GITHUB_PATH`, `$GITHUB_OUTPUT`, `$RUNNER_TEMP`
//! - Elsewhere: the current process `PATH` and log output

use crate::error::{ProvisionError, ProvisionResult};
use async_trait::async_trait;
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, info_span, Instrument};

/// Side-effect channel into the job runner
#[async_trait]
pub trait RunnerEnvironment: Send + Sync {
    /// Make `dir` available on the search path for later steps
    async fn add_path(&self, dir: &Path) -> ProvisionResult<()>;

    /// Publish a named output value
    async fn set_output(&self, name: &str, value: &str) -> ProvisionResult<()>;

    /// Runner-provided temp directory, if any
    fn temp_dir(&self) -> Option<PathBuf>;
}

/// Run `fut` inside a named log group
///
/// Every line logged while the future runs carries the group label.
pub async fn group<F: Future>(name: &str, fut: F) -> F::Output {
    info!("{}", name);
    fut.instrument(info_span!("group", name = %name)).await
}

/// Environment of a CI job runner, with a plain-process fallback
#[derive(Debug, Clone, Default)]
pub struct ActionsEnvironment {
    path_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    runner_temp: Option<PathBuf>,
}

impl ActionsEnvironment {
    /// Read runner file locations from the process environment
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            path_file: var("GITHUB_PATH"),
            output_file: var("GITHUB_OUTPUT"),
            runner_temp: var("RUNNER_TEMP"),
        }
    }

    async fn append_line(file: &Path, line: &str) -> ProvisionResult<()> {
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .await
            .map_err(|e| ProvisionError::io(format!("opening {}", file.display()), e))?;

        handle
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(|e| ProvisionError::io(format!("writing {}", file.display()), e))?;
        handle
            .flush()
            .await
            .map_err(|e| ProvisionError::io(format!("writing {}", file.display()), e))
    }
}

#[async_trait]
impl RunnerEnvironment for ActionsEnvironment {
    async fn add_path(&self, dir: &Path) -> ProvisionResult<()> {
        if let Some(ref file) = self.path_file {
            Self::append_line(file, &dir.to_string_lossy()).await?;
        }

        // Later lookups in this process must see the directory too
        let mut entries = vec![dir.to_path_buf()];
        if let Some(current) = std::env::var_os("PATH") {
            entries.extend(std::env::split_paths(&current));
        }
        let joined: OsString = std::env::join_paths(entries)
            .map_err(|e| ProvisionError::Internal(format!("invalid PATH entry: {}", e)))?;
        std::env::set_var("PATH", joined);

        debug!("Added {} to PATH", dir.display());
        Ok(())
    }

    async fn set_output(&self, name: &str, value: &str) -> ProvisionResult<()> {
        match self.output_file {
            Some(ref file) => Self::append_line(file, &format!("{}={}", name, value)).await,
            None => {
                info!("Output {}={}", name, value);
                Ok(())
            }
        }
    }

    fn temp_dir(&self) -> Option<PathBuf> {
        self.runner_temp.clone()
    }
}
