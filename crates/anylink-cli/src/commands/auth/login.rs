use anylink_auth::{CodeSource, FixedCodes};
use anylink_config::AnylinkConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLoginArgs;
use crate::context::{AppContext, StdinCodes};
use crate::output::{Tabular, output};

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    /// The stored key was reused; no pairing code was needed.
    cached_key: bool,
    port: u16,
    env_file: String,
}

impl Tabular for AuthLoginResponse {
    fn headers(&self) -> Vec<&'static str> {
        vec!["authenticated", "key", "port", "env_file"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.authenticated.to_string(),
            if self.cached_key { "cached" } else { "stored" }.to_string(),
            self.port.to_string(),
            self.env_file.clone(),
        ]]
    }
}

/// Handle `anylink auth login`.
pub async fn handle(
    args: &AuthLoginArgs,
    config: &AnylinkConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let ctx = AppContext::connect(config).await?;
    let cached_key = ctx.store().load()?.has_app_key();

    let mut stdin = StdinCodes;
    let mut fixed = FixedCodes::new(args.code.iter().cloned());
    let codes: &mut dyn CodeSource = if args.code.is_empty() {
        &mut stdin
    } else {
        &mut fixed
    };
    ctx.session_with(codes).await?;

    output(
        &AuthLoginResponse {
            authenticated: true,
            cached_key,
            port: ctx.port,
            env_file: ctx.store().path().display().to_string(),
        },
        flags.format,
    )
}
