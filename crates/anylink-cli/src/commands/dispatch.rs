use anylink_config::AnylinkConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &AnylinkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Ports => commands::ports::handle(config, flags),
        Commands::Auth { action } => commands::auth::handle(&action, config, flags).await,
        Commands::Spaces => commands::spaces::handle(config, flags).await,
        Commands::Types { action } => commands::types::handle(&action, config, flags).await,
        Commands::Links(args) => commands::links::handle(&args, config, flags).await,
    }
}
