//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// gradle-provision - Provision Gradle on CI build machines
///
/// Installs a requested Gradle version (or reuses one already present)
/// and makes it available to later build steps.
#[derive(Parser, Debug)]
#[command(name = "gradle-provision")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "GRADLE_PROVISION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a Gradle version and add it to PATH
    Install(InstallArgs),

    /// Find or install a Gradle of at least the given version
    AtLeast(AtLeastArgs),

    /// Resolve a version specifier without installing
    Resolve(ResolveArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Version, channel (current, release-candidate, nightly, release-nightly) or "wrapper"
    #[arg(id = "gradle_version", value_name = "VERSION", env = "GRADLE_VERSION", default_value = "")]
    pub version: String,
}

/// Arguments for the at-least command
#[derive(Parser, Debug)]
pub struct AtLeastArgs {
    /// Minimum acceptable Gradle version
    pub minimum_version: String,

    /// Gradle executables to consider before installing
    pub candidates: Vec<PathBuf>,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Version or channel to resolve
    #[arg(id = "gradle_version", value_name = "VERSION")]
    pub version: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Parse the `general.log_format` config value
    pub fn from_config(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}
