//! At-least command - reuse or install a minimum Gradle version

use crate::cli::args::AtLeastArgs;
use crate::config::Config;
use crate::error::ProvisionResult;
use crate::provision::Services;
use crate::ui::UiContext;

/// Execute the at-least command
pub async fn execute(args: AtLeastArgs, config: &Config) -> ProvisionResult<()> {
    let services = Services::from_config(config, UiContext::detect());

    let executable = services
        .provisioner()
        .provision_gradle_at_least(&args.minimum_version, &args.candidates)
        .await?;
    println!("{}", executable.display());
    Ok(())
}
