use anylink_rpc::RpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("challenge request rejected: {0}")]
    ChallengeRejected(#[source] RpcError),

    #[error("code rejected, enter the code currently shown by the application: {0}")]
    CodeRejected(#[source] RpcError),

    #[error("no code entered; authentication aborted")]
    EmptyCode,

    /// Session creation refused the application key. When `cached` is set
    /// the key came from the credential store and may have been revoked.
    #[error("application key rejected{}: {source}", cached_note(.cached))]
    KeyRejected {
        cached: bool,
        #[source]
        source: RpcError,
    },

    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error("credential store error: {0}")]
    Store(String),

    #[error("failed to read code: {0}")]
    Input(#[from] std::io::Error),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl AuthError {
    /// Whether the remote refused the handshake (as opposed to the channel
    /// failing).
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::ChallengeRejected(_) | Self::CodeRejected(_) | Self::KeyRejected { .. }
        )
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn cached_note(cached: &bool) -> &'static str {
    if *cached {
        " (cached key, possibly revoked)"
    } else {
        ""
    }
}
