//! gradle-provision - CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use gradle_provision::cli::args::LogFormat;
use gradle_provision::cli::{Cli, Commands};
use gradle_provision::config::ConfigManager;
use gradle_provision::error::ProvisionResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ProvisionResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    // Provisioning commands report progress at info by default; -v raises
    // every command to info and -vv to debug
    let provisioning = matches!(cli.command, Commands::Install(_) | Commands::AtLeast(_));
    let filter = match (cli.verbose, provisioning) {
        (0, false) => EnvFilter::new("gradle_provision=warn"),
        (0, true) | (1, _) => EnvFilter::new("gradle_provision=info"),
        _ => EnvFilter::new("gradle_provision=debug"),
    };
    let format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.general.log_format));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }

    match cli.command {
        Commands::Install(args) => gradle_provision::cli::commands::install(args, &config).await,
        Commands::AtLeast(args) => gradle_provision::cli::commands::at_least(args, &config).await,
        Commands::Resolve(args) => gradle_provision::cli::commands::resolve(args, &config).await,
        Commands::Config(args) => {
            gradle_provision::cli::commands::config(args, &manager, &config).await
        }
    }
}
