//! Typed wrapper over the remote full-text search.

use anylink_core::entities::{SearchQuery, SearchResult};
use anylink_rpc::retry::{self, RetryConfig};
use anylink_rpc::{ClientCommands, Session};

use crate::error::SearchError;

/// One search call per query, no pagination: callers get exactly what the
/// remote returns. Transient transport failures are retried according to
/// the [`RetryConfig`]; remote rejections are returned immediately.
pub struct SearchFacade<C: ?Sized> {
    session: Session<C>,
    retry: RetryConfig,
}

impl<C: ClientCommands + ?Sized> SearchFacade<C> {
    #[must_use]
    pub const fn new(session: Session<C>, retry: RetryConfig) -> Self {
        Self { session, retry }
    }

    /// Run one search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Rpc`] if the call fails.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SearchError> {
        let results =
            retry::with_retry(&self.retry, "search", || self.session.search(query)).await?;
        tracing::debug!(
            full_text = %query.full_text,
            highlights = query.with_highlights,
            results = results.len(),
            "search facade call"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use anylink_core::entities::SessionToken;
    use anylink_rpc::test_support::{FakeClient, object};

    use super::*;

    fn fast_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        }
    }

    fn facade(client: FakeClient, retry: RetryConfig) -> (Arc<FakeClient>, SearchFacade<FakeClient>) {
        let client = Arc::new(client.with_session("k1", "t1"));
        let session = Session::new(Arc::clone(&client), SessionToken::new("t1"));
        (client, SearchFacade::new(session, retry))
    }

    #[tokio::test]
    async fn returns_remote_results_unchanged() {
        let (_client, facade) = facade(
            FakeClient::new()
                .with_object(object("obj-1", "Alpha", "space-a", &[]))
                .with_object(object("obj-2", "Alphabet", "space-a", &[])),
            RetryConfig::none(),
        );

        let results = facade.search(&SearchQuery::plain("alpha")).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.object_id.as_str()).collect();
        assert_eq!(ids, vec!["obj-1", "obj-2"]);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let (client, facade) = facade(
            FakeClient::new()
                .with_object(object("obj-1", "Alpha", "space-a", &[]))
                .with_transient_search_failures(2),
            fast_retry(3),
        );

        let results = facade.search(&SearchQuery::plain("alpha")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(client.calls().len(), 3);
    }

    #[tokio::test]
    async fn without_retry_transport_errors_surface_immediately() {
        let (client, facade) = facade(
            FakeClient::new().with_transient_search_failures(1),
            RetryConfig::none(),
        );

        let err = facade.search(&SearchQuery::all()).await.unwrap_err();
        assert!(matches!(err, SearchError::Rpc(_)));
        assert_eq!(client.calls().len(), 1);
    }
}
