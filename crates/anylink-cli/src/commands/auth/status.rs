use anylink_config::AnylinkConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::{self, AppContext};
use crate::output::{Tabular, cell, output};

#[derive(Serialize)]
struct AuthStatusResponse {
    env_file: String,
    app_key_stored: bool,
    default_type: Option<String>,
    /// `active`, `rejected`, `unreachable`, or `missing` when no key is stored.
    session: &'static str,
    port: Option<u16>,
    note: Option<String>,
}

impl Tabular for AuthStatusResponse {
    fn headers(&self) -> Vec<&'static str> {
        vec!["env_file", "app_key", "default_type", "session", "port", "note"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.env_file.clone(),
            self.app_key_stored.to_string(),
            cell(self.default_type.as_deref()),
            self.session.to_string(),
            cell(self.port.map(|p| p.to_string()).as_deref()),
            cell(self.note.as_deref()),
        ]]
    }
}

/// Handle `anylink auth status`. Never prompts: with no stored key the
/// application is not contacted.
pub async fn handle(config: &AnylinkConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = context::credential_store(config);
    let credential = store.load()?;

    let mut status = AuthStatusResponse {
        env_file: store.path().display().to_string(),
        app_key_stored: credential.has_app_key(),
        default_type: credential.default_type_key,
        session: "missing",
        port: None,
        note: None,
    };

    if status.app_key_stored {
        match AppContext::connect(config).await {
            Err(error) => {
                status.session = "unreachable";
                status.note = Some(format!("{error:#}"));
            }
            Ok(ctx) => {
                status.port = Some(ctx.port);
                let mut bootstrapper = ctx.bootstrapper();
                let begun = bootstrapper.begin().await.map(|_| ());
                let activated = match begun {
                    Ok(()) => bootstrapper.activate().await.map(drop),
                    Err(error) => Err(error),
                };
                match activated {
                    Ok(()) => status.session = "active",
                    Err(error) => {
                        status.session = if error.is_rejection() { "rejected" } else { "unreachable" };
                        status.note = Some(format!("{:#}", context::explain_auth_error(error, &store)));
                    }
                }
            }
        }
    } else {
        status.note = Some("not paired; run `anylink auth login`".into());
    }

    output(&status, flags.format)
}
