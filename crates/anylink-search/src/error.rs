//! Search error types for anylink-search.

use anylink_rpc::RpcError;

/// Errors from search, resolution and extraction.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The remote call failed (after any retries).
    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    /// Invalid or empty search input.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}
