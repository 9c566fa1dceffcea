//! Resolve command - show what a version specifier points at

use crate::cli::args::ResolveArgs;
use crate::config::Config;
use crate::error::ProvisionResult;
use crate::registry::HttpVersionRegistry;
use crate::resolve::{resolve_version, VersionSpecifier};

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> ProvisionResult<()> {
    let specifier = VersionSpecifier::parse(&args.version);
    if !specifier.is_configured() {
        println!("Gradle not configured");
        return Ok(());
    }

    let registry = HttpVersionRegistry::new(config.registry.base_url.clone());
    let info = resolve_version(&registry, &specifier).await?;
    println!("{} {}", info.version, info.download_url);
    Ok(())
}
