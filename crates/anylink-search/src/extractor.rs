//! Link-graph extraction over two full-text sweeps.
//!
//! Each sweep searches with highlights for its grammar's marker, scans
//! every highlight for tokens, resolves the distinct tokens through the
//! exact resolver and records one edge per resolved token occurrence.
//! Unresolved tokens are dropped with a `debug` log.

use std::collections::{HashMap, HashSet};

use anylink_core::entities::{SearchQuery, SearchResult};
use anylink_core::enums::ReferenceKind;
use anylink_rpc::ClientCommands;
use futures::{StreamExt as _, TryStreamExt as _, stream};

use crate::error::SearchError;
use crate::facade::SearchFacade;
use crate::graph::LinkGraph;
use crate::resolver::ExactNameResolver;
use crate::tokens;

/// Sweeps in the order they run.
pub const SWEEPS: [ReferenceKind; 2] = [ReferenceKind::Bracket, ReferenceKind::Hashtag];

/// Counters for one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SweepStats {
    pub results: usize,
    pub tokens: usize,
    pub resolved: usize,
    pub edges_added: usize,
}

pub struct LinkGraphExtractor<'a, C: ?Sized> {
    facade: &'a SearchFacade<C>,
    resolver: ExactNameResolver<'a, C>,
    concurrency: usize,
}

impl<'a, C: ClientCommands + ?Sized> LinkGraphExtractor<'a, C> {
    /// `concurrency` bounds in-flight resolve calls within a sweep; zero is
    /// treated as one.
    #[must_use]
    pub const fn new(facade: &'a SearchFacade<C>, concurrency: usize) -> Self {
        Self {
            facade,
            resolver: ExactNameResolver::new(facade),
            concurrency: if concurrency == 0 { 1 } else { concurrency },
        }
    }

    /// Run both sweeps, bracket first, into a fresh graph.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if a sweep search or a resolve call fails.
    pub async fn extract(&self) -> Result<LinkGraph, SearchError> {
        let mut graph = LinkGraph::new();
        for kind in SWEEPS {
            self.sweep(kind, &mut graph).await?;
        }
        tracing::info!(
            objects_with_links = graph.object_count(),
            edges = graph.edge_count(),
            spaces = graph.spaces().len(),
            "link extraction complete"
        );
        Ok(graph)
    }

    /// Run one sweep, adding its edges to `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the sweep search or a resolve call fails.
    pub async fn sweep(
        &self,
        kind: ReferenceKind,
        graph: &mut LinkGraph,
    ) -> Result<SweepStats, SearchError> {
        let query = SearchQuery::highlighted(tokens::sweep_query(kind));
        let results = self.facade.search(&query).await?;

        let mut stats = SweepStats {
            results: results.len(),
            ..SweepStats::default()
        };
        let resolved = self.resolve_distinct(kind, &results).await?;
        stats.tokens = resolved.len();
        stats.resolved = resolved.values().filter(|target| target.is_some()).count();

        for source in &results {
            for highlight in &source.highlights {
                for token in tokens::tokens(kind, highlight) {
                    match resolved.get(&token) {
                        Some(Some(target)) => {
                            if graph.record(source, target, highlight, kind) {
                                stats.edges_added += 1;
                            }
                        }
                        _ => tracing::debug!(
                            %kind,
                            token,
                            source = %source.object_id,
                            "dropping unresolved reference"
                        ),
                    }
                }
            }
        }

        tracing::info!(
            %kind,
            results = stats.results,
            tokens = stats.tokens,
            resolved = stats.resolved,
            edges = stats.edges_added,
            "sweep finished"
        );
        Ok(stats)
    }

    /// Resolve every distinct token in the sweep results once.
    async fn resolve_distinct(
        &self,
        kind: ReferenceKind,
        results: &[SearchResult],
    ) -> Result<HashMap<String, Option<SearchResult>>, SearchError> {
        let mut seen = HashSet::new();
        let distinct: Vec<String> = results
            .iter()
            .flat_map(|result| result.highlights.iter())
            .flat_map(|highlight| tokens::tokens(kind, highlight))
            .filter(|token| seen.insert(token.clone()))
            .collect();

        let resolver = &self.resolver;
        let resolved: Vec<(String, Option<SearchResult>)> = stream::iter(distinct)
            .map(|token| async move {
                let target = resolver.resolve(&token).await?;
                Ok::<_, SearchError>((token, target))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(resolved.into_iter().collect())
    }
}
