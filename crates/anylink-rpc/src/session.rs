//! Authenticated call context.

use std::sync::Arc;

use anylink_core::entities::{SearchQuery, SearchResult, SessionToken};

use crate::client::ClientCommands;
use crate::error::RpcError;

/// A client paired with the session token created for this run.
///
/// Constructed once by the session bootstrapper and passed by reference to
/// every component that talks to the remote. The token is read-only after
/// creation.
pub struct Session<C: ?Sized> {
    client: Arc<C>,
    token: SessionToken,
}

impl<C: ?Sized> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            token: self.token.clone(),
        }
    }
}

impl<C: ClientCommands + ?Sized> Session<C> {
    #[must_use]
    pub const fn new(client: Arc<C>, token: SessionToken) -> Self {
        Self { client, token }
    }

    #[must_use]
    pub const fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Search with the session token attached.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] on transport failure or remote rejection.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, RpcError> {
        self.client.search_with_meta(&self.token, query).await
    }
}

impl<C: ?Sized> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("token", &self.token).finish_non_exhaustive()
    }
}
