//! Install command - provision a Gradle version onto PATH

use crate::cli::args::InstallArgs;
use crate::config::Config;
use crate::error::ProvisionResult;
use crate::provision::Services;
use crate::ui::UiContext;

/// Execute the install command
pub async fn execute(args: InstallArgs, config: &Config) -> ProvisionResult<()> {
    let services = Services::from_config(config, UiContext::detect());

    match services.provisioner().provision_gradle(&args.version).await? {
        Some(executable) => println!("{}", executable.display()),
        None => println!("Gradle not configured"),
    }
    Ok(())
}
