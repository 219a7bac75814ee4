//! Session bootstrap: challenge, solve, create session.
//!
//! ```text
//! Unauthenticated ──(no cached key)──▶ ChallengeIssued ──solve──▶ KeyObtained ──activate──▶ SessionActive
//!        └────────────(cached key)────────────────────────────────▲
//! ```
//!
//! A rejected code leaves the bootstrapper in `ChallengeIssued` so the
//! caller can try another code against the same challenge. Whether the
//! remote still honours that challenge after a failure is up to the remote;
//! this layer never retries on its own and never re-issues a challenge
//! implicitly.

use std::sync::Arc;

use anylink_rpc::{ClientCommands, RpcError, Session};
use async_trait::async_trait;

use crate::credential_store::{APP_KEY, CredentialStore};
use crate::error::AuthError;

/// Where the bootstrapper is in the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    ChallengeIssued { challenge_id: String },
    /// An application key is available; `cached` when it came from the
    /// credential store rather than a fresh solve.
    KeyObtained { cached: bool },
    SessionActive,
}

impl AuthState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::ChallengeIssued { .. } => "challenge_issued",
            Self::KeyObtained { .. } => "key_obtained",
            Self::SessionActive => "session_active",
        }
    }
}

/// Supplies the short code the user reads off the application.
///
/// Async so that waiting on a person stays cancellable: implementations
/// that read a terminal must not block the runtime thread.
#[async_trait]
pub trait CodeSource: Send {
    /// Code for attempt `attempt` (1-based), or `None` to give up.
    ///
    /// # Errors
    ///
    /// Implementations return [`AuthError`] if input cannot be read.
    async fn next_code(&mut self, attempt: u32) -> Result<Option<String>, AuthError>;
}

/// Fixed list of codes, tried in order. Mostly for non-interactive use.
#[derive(Debug, Clone, Default)]
pub struct FixedCodes(std::collections::VecDeque<String>);

impl FixedCodes {
    #[must_use]
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(codes.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CodeSource for FixedCodes {
    async fn next_code(&mut self, _attempt: u32) -> Result<Option<String>, AuthError> {
        Ok(self.0.pop_front())
    }
}

pub struct SessionBootstrapper<C: ClientCommands + ?Sized> {
    client: Arc<C>,
    store: CredentialStore,
    app_name: String,
    state: AuthState,
    app_key: Option<String>,
}

impl<C: ClientCommands + ?Sized> SessionBootstrapper<C> {
    #[must_use]
    pub fn new(client: Arc<C>, store: CredentialStore, app_name: impl Into<String>) -> Self {
        Self {
            client,
            store,
            app_name: app_name.into(),
            state: AuthState::Unauthenticated,
            app_key: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    /// Leave `Unauthenticated`: use the cached key if there is one,
    /// otherwise request a new challenge.
    ///
    /// # Errors
    ///
    /// `InvalidState` outside `Unauthenticated`; `ChallengeRejected` if the
    /// remote refuses to issue a challenge; `Store`/`Rpc` otherwise.
    pub async fn begin(&mut self) -> Result<&AuthState, AuthError> {
        self.expect("begin", |s| matches!(s, AuthState::Unauthenticated))?;

        if let Some(app_key) = self.store.load()?.app_key {
            tracing::debug!(path = %self.store.path().display(), "using cached application key");
            self.app_key = Some(app_key);
            self.state = AuthState::KeyObtained { cached: true };
            return Ok(&self.state);
        }

        let challenge_id = self
            .client
            .new_challenge(&self.app_name)
            .await
            .map_err(|e| classify(e, AuthError::ChallengeRejected))?;
        tracing::info!(app_name = %self.app_name, "challenge issued; waiting for code");
        self.state = AuthState::ChallengeIssued { challenge_id };
        Ok(&self.state)
    }

    /// Answer the outstanding challenge and persist the resulting key.
    ///
    /// # Errors
    ///
    /// `InvalidState` outside `ChallengeIssued`; `EmptyCode` for a blank
    /// code; `CodeRejected` if the remote refuses it (state unchanged);
    /// `Store` if the key cannot be persisted.
    pub async fn solve(&mut self, code: &str) -> Result<(), AuthError> {
        let AuthState::ChallengeIssued { challenge_id } = &self.state else {
            return Err(self.invalid("solve a challenge"));
        };
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::EmptyCode);
        }

        let app_key = self
            .client
            .solve_challenge(challenge_id, code)
            .await
            .map_err(|e| classify(e, AuthError::CodeRejected))?;

        self.store.append(APP_KEY, &app_key)?;
        tracing::info!(path = %self.store.path().display(), "application key stored");
        self.app_key = Some(app_key);
        self.state = AuthState::KeyObtained { cached: false };
        Ok(())
    }

    /// Exchange the application key for a session.
    ///
    /// # Errors
    ///
    /// `InvalidState` outside `KeyObtained`; `KeyRejected` if the remote
    /// refuses the key. A rejected cached key is not discarded: the caller
    /// decides whether to drop it and start a fresh challenge.
    pub async fn activate(&mut self) -> Result<Session<C>, AuthError> {
        let AuthState::KeyObtained { cached } = self.state else {
            return Err(self.invalid("create a session"));
        };
        let Some(app_key) = self.app_key.as_deref() else {
            return Err(self.invalid("create a session"));
        };

        let token = self
            .client
            .create_session(app_key)
            .await
            .map_err(|e| classify(e, |source| AuthError::KeyRejected { cached, source }))?;

        tracing::info!(cached, "session established");
        self.state = AuthState::SessionActive;
        Ok(Session::new(Arc::clone(&self.client), token))
    }

    /// Drive the whole handshake, asking `codes` for a code after each
    /// rejection until it gives up or `max_code_attempts` is reached.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::begin`], [`Self::solve`] or [`Self::activate`];
    /// the last `CodeRejected` when attempts run out.
    pub async fn run(
        &mut self,
        codes: &mut dyn CodeSource,
        max_code_attempts: u32,
    ) -> Result<Session<C>, AuthError> {
        self.begin().await?;

        let mut attempt = 0;
        while matches!(self.state, AuthState::ChallengeIssued { .. }) {
            attempt += 1;
            let Some(code) = codes.next_code(attempt).await? else {
                return Err(AuthError::EmptyCode);
            };
            match self.solve(&code).await {
                Ok(()) => {}
                Err(error @ AuthError::CodeRejected(_)) if attempt < max_code_attempts => {
                    tracing::warn!(%error, attempt, "code rejected");
                }
                Err(error) => return Err(error),
            }
        }

        self.activate().await
    }

    fn expect(&self, action: &'static str, ok: impl Fn(&AuthState) -> bool) -> Result<(), AuthError> {
        if ok(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> AuthError {
        AuthError::InvalidState {
            action,
            state: self.state.as_str(),
        }
    }
}

/// Map a remote refusal to the given auth error; leave transport failures
/// as [`AuthError::Rpc`].
fn classify(error: RpcError, rejected: impl FnOnce(RpcError) -> AuthError) -> AuthError {
    if error.is_rejection() {
        rejected(error)
    } else {
        AuthError::Rpc(error)
    }
}
