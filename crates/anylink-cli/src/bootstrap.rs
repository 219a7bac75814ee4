use anyhow::Context;
use anylink_config::AnylinkConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<AnylinkConfig> {
    let mut config =
        AnylinkConfig::load_with_dotenv().context("failed to load anylink configuration")?;
    apply_overrides(&mut config, flags);
    config
        .validate()
        .context("invalid command-line override")?;
    Ok(config)
}

fn apply_overrides(config: &mut AnylinkConfig, flags: &GlobalFlags) {
    if let Some(port) = flags.port {
        config.discovery.port = Some(port);
    }
    if let Some(env_file) = &flags.env_file {
        config.store.env_file.clone_from(env_file);
    }
}
