mod login;
mod status;

use anylink_config::AnylinkConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;

/// Handle `anylink auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    config: &AnylinkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login::handle(args, config, flags).await,
        AuthCommands::Status => status::handle(config, flags).await,
    }
}
