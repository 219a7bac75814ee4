use std::io::{BufRead as _, Write as _};
use std::sync::Arc;

use anyhow::Context;
use anylink_auth::{AuthError, CodeSource, CredentialStore, SessionBootstrapper};
use anylink_config::AnylinkConfig;
use anylink_rpc::discovery::{self, SystemSocketTable};
use anylink_rpc::{GrpcClient, RetryConfig, Session};
use anylink_search::SearchFacade;
use async_trait::async_trait;

use crate::progress::Progress;

/// Wrong codes tolerated before `auth login` gives up.
pub const MAX_CODE_ATTEMPTS: u32 = 3;

/// Connected client plus the configuration it was built from.
pub struct AppContext {
    pub config: AnylinkConfig,
    pub port: u16,
    client: Arc<GrpcClient>,
}

impl AppContext {
    /// Resolve the application port and dial it.
    pub async fn connect(config: &AnylinkConfig) -> anyhow::Result<Self> {
        let port = resolve_port(config)?;
        let client = GrpcClient::connect(&config.discovery.host, port, config.client.timeout())
            .await
            .with_context(|| format!("failed to connect to {}:{port}", config.discovery.host))?;
        Ok(Self {
            config: config.clone(),
            port,
            client: Arc::new(client),
        })
    }

    #[must_use]
    pub fn store(&self) -> CredentialStore {
        credential_store(&self.config)
    }

    #[must_use]
    pub fn bootstrapper(&self) -> SessionBootstrapper<GrpcClient> {
        SessionBootstrapper::new(
            Arc::clone(&self.client),
            self.store(),
            self.config.client.app_name.clone(),
        )
    }

    /// Establish a session, pairing first (prompting on stdin) if no key is
    /// stored yet.
    pub async fn session(&self) -> anyhow::Result<Session<GrpcClient>> {
        self.session_with(&mut StdinCodes).await
    }

    pub async fn session_with(
        &self,
        codes: &mut dyn CodeSource,
    ) -> anyhow::Result<Session<GrpcClient>> {
        self.bootstrapper()
            .run(codes, MAX_CODE_ATTEMPTS)
            .await
            .map_err(|error| explain_auth_error(error, &self.store()))
    }

    #[must_use]
    pub fn facade(&self, session: Session<GrpcClient>) -> SearchFacade<GrpcClient> {
        SearchFacade::new(session, retry_config(&self.config))
    }
}

#[must_use]
pub fn credential_store(config: &AnylinkConfig) -> CredentialStore {
    CredentialStore::new(&config.store.env_file)
}

#[must_use]
pub fn retry_config(config: &AnylinkConfig) -> RetryConfig {
    RetryConfig {
        max_attempts: config.search.retry_attempts,
        base_delay: config.search.retry_base_delay(),
        max_delay: config.search.retry_max_delay(),
    }
}

/// The configured port, or the one discovery selects.
pub fn resolve_port(config: &AnylinkConfig) -> anyhow::Result<u16> {
    if let Some(port) = config.discovery.port {
        tracing::debug!(port, "using configured port; skipping discovery");
        return Ok(port);
    }

    let spinner = Progress::spinner("locating application");
    let table = SystemSocketTable::new();
    let found = discovery::discover(
        &table,
        &config.discovery.process_filter,
        config.discovery.policy,
    );
    match found {
        Ok(endpoint) => {
            spinner.finish_clear();
            Ok(endpoint.port)
        }
        Err(error) => {
            spinner.finish_err("application not found");
            Err(anyhow::Error::new(error).context("endpoint discovery failed"))
        }
    }
}

/// Attach a recovery hint to auth failures the user can fix.
pub fn explain_auth_error(error: AuthError, store: &CredentialStore) -> anyhow::Error {
    let hint = match &error {
        AuthError::KeyRejected { cached: true, .. } => Some(format!(
            "remove the APP_KEY line from {} and run `anylink auth login` again",
            store.path().display()
        )),
        AuthError::EmptyCode => Some("run `anylink auth login` and enter the code shown by the application".into()),
        _ => None,
    };
    match hint {
        Some(hint) => anyhow::Error::new(error).context(hint),
        None => anyhow::Error::new(error),
    }
}

/// Reads pairing codes from stdin, prompting on stderr.
pub struct StdinCodes;

#[async_trait]
impl CodeSource for StdinCodes {
    async fn next_code(&mut self, attempt: u32) -> Result<Option<String>, AuthError> {
        let mut stderr = std::io::stderr();
        if attempt == 1 {
            writeln!(stderr, "Pair anylink with Anytype: a code is now shown in the application.")?;
        }
        write!(stderr, "Enter the 4-digit code: ")?;
        stderr.flush()?;

        Ok(read_stdin_line().await?.map(|line| line.trim().to_string()))
    }
}

/// One line from stdin, or `None` at end of input.
///
/// The read runs on the blocking pool so a Ctrl-C raced against the command
/// still fires while the user is at a prompt.
pub async fn read_stdin_line() -> std::io::Result<Option<String>> {
    tokio::task::spawn_blocking(|| -> std::io::Result<Option<String>> {
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        Ok((read > 0).then_some(line))
    })
    .await
    .map_err(|e| std::io::Error::other(format!("spawn_blocking join: {e}")))?
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn retry_config_follows_search_section() {
        let mut config = AnylinkConfig::default();
        config.search.retry_attempts = 5;
        config.search.retry_base_delay_ms = 50;
        config.search.retry_max_delay_ms = 500;

        let retry = retry_config(&config);
        assert_eq!(retry.max_attempts, 5);
        assert_eq!(retry.base_delay, Duration::from_millis(50));
        assert_eq!(retry.max_delay, Duration::from_millis(500));
    }

    #[test]
    fn configured_port_skips_discovery() {
        let mut config = AnylinkConfig::default();
        config.discovery.port = Some(31007);
        assert_eq!(resolve_port(&config).unwrap(), 31007);
    }

    #[test]
    fn revoked_cached_key_gets_a_hint() {
        let store = CredentialStore::new("/tmp/anylink-test.env");
        let error = AuthError::KeyRejected {
            cached: true,
            source: anylink_rpc::RpcError::Transport("x".into()),
        };
        let message = format!("{:#}", explain_auth_error(error, &store));
        assert!(message.contains("remove the APP_KEY line from /tmp/anylink-test.env"));
    }

    #[test]
    fn other_auth_errors_pass_through() {
        let store = CredentialStore::new(".env");
        let error = AuthError::Store("disk full".into());
        let message = format!("{:#}", explain_auth_error(error, &store));
        assert_eq!(message, "credential store error: disk full");
    }
}
