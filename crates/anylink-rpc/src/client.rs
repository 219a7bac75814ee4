//! The opaque RPC capability consumed by the rest of the workspace.

use std::fmt;

use anylink_core::entities::{SearchQuery, SearchResult, SessionToken};
use async_trait::async_trait;

use crate::error::RpcError;

/// Remote operations this client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    NewChallenge,
    SolveChallenge,
    CreateSession,
    SearchWithMeta,
}

impl Operation {
    /// gRPC method path on the `anytype.ClientCommands` service.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::NewChallenge => "/anytype.ClientCommands/AccountLocalLinkNewChallenge",
            Self::SolveChallenge => "/anytype.ClientCommands/AccountLocalLinkSolveChallenge",
            Self::CreateSession => "/anytype.ClientCommands/WalletCreateSession",
            Self::SearchWithMeta => "/anytype.ClientCommands/ObjectSearchWithMeta",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewChallenge => "new_challenge",
            Self::SolveChallenge => "solve_challenge",
            Self::CreateSession => "create_session",
            Self::SearchWithMeta => "search_with_meta",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal command surface of the note-graph application.
///
/// Implementations must be safe for concurrent in-flight calls; the link
/// extractor issues resolver searches in parallel.
#[async_trait]
pub trait ClientCommands: Send + Sync {
    /// Ask the application to show a pairing code; returns the challenge id.
    async fn new_challenge(&self, app_name: &str) -> Result<String, RpcError>;

    /// Answer a challenge with the code the user read off the application;
    /// returns the durable application key.
    async fn solve_challenge(&self, challenge_id: &str, answer: &str) -> Result<String, RpcError>;

    /// Exchange an application key for a session token.
    async fn create_session(&self, app_key: &str) -> Result<SessionToken, RpcError>;

    /// Full-text object search, authenticated by `token`. One call, no
    /// pagination.
    async fn search_with_meta(
        &self,
        token: &SessionToken,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, RpcError>;
}
