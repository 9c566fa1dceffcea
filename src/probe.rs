//! Gradle executable discovery and version probing
//!
//! Finds `gradle` on the search path, asks an executable for its version
//! and compares Gradle version strings, which are not plain semver
//! (`8.5`, `8.6-rc-1`, `8.7-milestone-2`, `8.8-20240301010000+0000`).

use async_trait::async_trait;
use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::str::FromStr;
use tokio::process::Command;
use tracing::{debug, warn};

/// Name of the launcher script inside a distribution's `bin/` directory
pub fn executable_name() -> &'static str {
    if cfg!(windows) {
        "gradle.bat"
    } else {
        "gradle"
    }
}

/// Inspects Gradle executables already present on the machine
#[async_trait]
pub trait VersionProbe: Send + Sync {
    /// Version reported by `executable`, if it can be determined
    async fn determine_version(&self, executable: &Path) -> Option<String>;

    /// A Gradle executable reachable through the search path
    async fn find_on_path(&self) -> Option<PathBuf>;
}

/// Probe that runs `gradle --version`
#[derive(Debug, Default, Clone, Copy)]
pub struct GradleProbe;

#[async_trait]
impl VersionProbe for GradleProbe {
    async fn determine_version(&self, executable: &Path) -> Option<String> {
        if !executable.exists() {
            debug!("Gradle candidate {} does not exist", executable.display());
            return None;
        }

        let output = Command::new(executable)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                let version = parse_version_output(&String::from_utf8_lossy(&output.stdout));
                debug!("{} reports Gradle {:?}", executable.display(), version);
                version
            }
            Ok(output) => {
                warn!(
                    "{} --version exited with {}",
                    executable.display(),
                    output.status
                );
                None
            }
            Err(e) => {
                warn!("Failed to run {} --version: {}", executable.display(), e);
                None
            }
        }
    }

    async fn find_on_path(&self) -> Option<PathBuf> {
        which::which(executable_name()).ok()
    }
}

/// Extract the version from `gradle --version` output
///
/// The relevant line looks like `Gradle 8.5`.
pub fn parse_version_output(output: &str) -> Option<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Gradle "))
        .map(str::trim)
        .find(|v| !v.is_empty() && !v.contains(' '))
        .map(str::to_string)
}

/// Whether `actual` satisfies a minimum of `required`
///
/// Identical strings always satisfy. Versions that cannot be parsed
/// only satisfy when identical.
pub fn version_is_at_least(actual: &str, required: &str) -> bool {
    if actual == required {
        return true;
    }

    match (actual.parse::<GradleVersion>(), required.parse::<GradleVersion>()) {
        (Ok(actual), Ok(required)) => actual >= required,
        _ => false,
    }
}

/// Pre-release stage of a Gradle version, in release order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Nightly build of an unreleased version
    Snapshot,
    Milestone(u32),
    ReleaseCandidate(u32),
    Final,
}

/// A parsed Gradle version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleVersion {
    pub base: Version,
    pub stage: Stage,
    /// Build timestamp (`yyyyMMddHHmmss`) of a snapshot build
    pub timestamp: Option<u64>,
}

/// Error returned for strings that are not Gradle versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError(String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a Gradle version: {}", self.0)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for GradleVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_string());
        let (numbers, suffix) = match s.split_once('-') {
            Some((numbers, suffix)) => (numbers, Some(suffix)),
            None => (s, None),
        };

        let base = coerce(numbers).ok_or_else(err)?;
        let mut stage = Stage::Final;
        let mut timestamp = None;

        if let Some(suffix) = suffix {
            let mut rest = suffix;
            if let Some((name, tail)) = rest.split_once('-') {
                let kind = match name {
                    "rc" => Some(Stage::ReleaseCandidate as fn(u32) -> Stage),
                    "milestone" => Some(Stage::Milestone as fn(u32) -> Stage),
                    _ => None,
                };
                if let Some(kind) = kind {
                    let (number, after) = match tail.split_once('-') {
                        Some((number, after)) => (number, after),
                        None => (tail, ""),
                    };
                    stage = kind(number.parse().map_err(|_| err())?);
                    rest = after;
                }
            }

            if !rest.is_empty() {
                timestamp = Some(parse_timestamp(rest).ok_or_else(err)?);
                if stage == Stage::Final {
                    stage = Stage::Snapshot;
                }
            }
        }

        Ok(Self {
            base,
            stage,
            timestamp,
        })
    }
}

impl Ord for GradleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // A snapshot precedes the stage it is building towards
        let ts = |v: &Self| v.timestamp.unwrap_or(u64::MAX);
        self.base
            .cmp(&other.base)
            .then(self.stage.cmp(&other.stage))
            .then(ts(self).cmp(&ts(other)))
    }
}

impl PartialOrd for GradleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Coerce `8`, `8.5` or `8.5.1` into a semver version
fn coerce(numbers: &str) -> Option<Version> {
    let parts: Vec<u64> = numbers
        .split('.')
        .map(|p| p.parse().ok())
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [major] => Some(Version::new(*major, 0, 0)),
        [major, minor] => Some(Version::new(*major, *minor, 0)),
        [major, minor, patch] => Some(Version::new(*major, *minor, *patch)),
        _ => None,
    }
}

/// Parse `20240301010000+0000` into `20240301010000`
fn parse_timestamp(s: &str) -> Option<u64> {
    let digits = s.split(['+', '-']).next()?;
    if digits.len() != 14 {
        return None;
    }
    digits.parse().ok()
}
