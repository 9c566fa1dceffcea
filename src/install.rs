//! Gradle installation
//!
//! Installs live under the provisioning root:
//!
//! ```text
//! <root>/installs/gradle-<version>/bin/gradle
//! <root>/installs/gradle-<version>/.provisioned
//! <root>/downloads/gradle-<version>-bin.zip
//! ```
//!
//! Distributions are extracted into a private staging directory under
//! `installs/`, fixed up and marked with `.provisioned`, then renamed into
//! place. An install counts as complete only when the marker is present; a
//! directory without it is left over from an interrupted run and is removed
//! before re-installing.

use crate::archive::extract_zip;
use crate::cache::CacheGateway;
use crate::config::Config;
use crate::environment::{group, RunnerEnvironment};
use crate::error::{ProvisionError, ProvisionResult};
use crate::probe::{executable_name, VersionProbe};
use crate::registry::VersionDescriptor;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Marker file written once an installation is complete
pub const COMPLETION_MARKER: &str = ".provisioned";

/// Filesystem layout of the provisioning root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionLayout {
    root: PathBuf,
}

impl ProvisionLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root from config override, else the runner temp dir, else the OS temp dir
    pub fn resolve(config: &Config, env: &dyn RunnerEnvironment) -> Self {
        if let Some(ref root) = config.provision.root {
            return Self::new(root.clone());
        }
        let temp = env.temp_dir().unwrap_or_else(std::env::temp_dir);
        Self::new(temp.join(".gradle-actions").join("gradle-installations"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn installs_dir(&self) -> PathBuf {
        self.root.join("installs")
    }

    pub fn install_dir(&self, version: &str) -> PathBuf {
        self.installs_dir().join(format!("gradle-{}", version))
    }

    pub fn download_path(&self, version: &str) -> PathBuf {
        self.root
            .join("downloads")
            .join(format!("gradle-{}-bin.zip", version))
    }

    /// Launcher inside an install directory
    pub fn executable(install_dir: &Path) -> PathBuf {
        install_dir.join("bin").join(executable_name())
    }
}

/// Installs resolved Gradle versions
pub struct Installer<'a> {
    layout: &'a ProvisionLayout,
    probe: &'a dyn VersionProbe,
    gateway: CacheGateway<'a>,
}

impl<'a> Installer<'a> {
    pub fn new(
        layout: &'a ProvisionLayout,
        probe: &'a dyn VersionProbe,
        gateway: CacheGateway<'a>,
    ) -> Self {
        Self {
            layout,
            probe,
            gateway,
        }
    }

    /// Provide `info.version`, reusing a matching Gradle on the search path
    pub async fn install(&self, info: &VersionDescriptor) -> ProvisionResult<PathBuf> {
        let label = format!("Provision Gradle {}", info.version);
        group(&label, async {
            if let Some(on_path) = self.probe.find_on_path().await {
                let on_path_version = self.probe.determine_version(&on_path).await;
                if on_path_version.as_deref() == Some(info.version.as_str()) {
                    info!(
                        "Gradle version {} is already available on PATH. Not installing.",
                        info.version
                    );
                    return Ok(on_path);
                }
            }

            self.locate_or_download(info).await
        })
        .await
    }

    /// Return the installed executable, downloading and extracting if required
    pub async fn locate_or_download(&self, info: &VersionDescriptor) -> ProvisionResult<PathBuf> {
        validate_version(&info.version)?;

        let installs_dir = self.layout.installs_dir();
        let install_dir = self.layout.install_dir(&info.version);

        if install_dir.join(COMPLETION_MARKER).exists() {
            info!(
                "Gradle installation already exists at {}",
                install_dir.display()
            );
            return Ok(ProvisionLayout::executable(&install_dir));
        }

        if install_dir.exists() {
            warn!(
                "Removing incomplete Gradle installation at {}",
                install_dir.display()
            );
            fs::remove_dir_all(&install_dir).await.map_err(|e| {
                ProvisionError::io(format!("removing {}", install_dir.display()), e)
            })?;
        }

        if info.download_url.is_empty() {
            return Err(ProvisionError::VersionInvalid {
                version: info.version.clone(),
                reason: "registry returned no download URL".to_string(),
            });
        }

        let download_path = self.layout.download_path(&info.version);
        self.gateway.fetch(info, &download_path).await?;

        // Extract and finish the install out of sight, then move it into place
        let staging = installs_dir.join(format!(
            ".staging-{}-{}",
            std::process::id(),
            Utc::now().timestamp_millis()
        ));
        let staged = stage_install(&download_path, &staging, &install_dir, &info.version).await;
        let published = match staged {
            Ok(staged_dir) => publish_install(&staged_dir, &install_dir).await,
            Err(e) => Err(e),
        };
        let _ = fs::remove_dir_all(&staging).await;
        published?;

        let executable = ProvisionLayout::executable(&install_dir);
        info!("Provisioned Gradle executable {}", executable.display());
        Ok(executable)
    }
}

/// Extract `archive` into `staging` and complete the install there
///
/// Returns the staged install directory, already marked complete.
async fn stage_install(
    archive: &Path,
    staging: &Path,
    install_dir: &Path,
    version: &str,
) -> ProvisionResult<PathBuf> {
    extract_zip(archive, staging).await?;

    let dir_name = install_dir
        .file_name()
        .ok_or_else(|| ProvisionError::Internal(format!("bad install dir {}", install_dir.display())))?;
    let staged_dir = staging.join(dir_name);
    let staged_executable = ProvisionLayout::executable(&staged_dir);
    if !staged_executable.exists() {
        return Err(ProvisionError::ExecutableMissing(ProvisionLayout::executable(
            install_dir,
        )));
    }
    make_executable(&staged_executable)?;

    fs::write(staged_dir.join(COMPLETION_MARKER), version)
        .await
        .map_err(|e| ProvisionError::io("writing installation marker", e))?;
    debug!("Staged Gradle {} at {}", version, staged_dir.display());
    Ok(staged_dir)
}

/// Rename a staged install into place
///
/// Losing the rename to another job that completed the same version
/// counts as success.
async fn publish_install(staged_dir: &Path, install_dir: &Path) -> ProvisionResult<()> {
    match fs::rename(staged_dir, install_dir).await {
        Ok(()) => {
            info!("Installed Gradle to {}", install_dir.display());
            Ok(())
        }
        Err(_) if install_dir.join(COMPLETION_MARKER).exists() => {
            info!(
                "Gradle installation at {} was completed concurrently",
                install_dir.display()
            );
            Ok(())
        }
        Err(e) => Err(ProvisionError::io(
            format!("moving install into {}", install_dir.display()),
            e,
        )),
    }
}

/// Reject versions that cannot safely name a directory
fn validate_version(version: &str) -> ProvisionResult<()> {
    let reason = if version.is_empty() {
        "version is empty"
    } else if version.contains(['/', '\\']) || version.contains("..") {
        "version contains path characters"
    } else {
        return Ok(());
    };

    Err(ProvisionError::VersionInvalid {
        version: version.to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> ProvisionResult<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o755);
    std::fs::set_permissions(path, perms)
        .map_err(|e| ProvisionError::io(format!("setting permissions on {}", path.display()), e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> ProvisionResult<()> {
    Ok(())
}
