//! Accumulated reference edges for one run.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use anylink_core::entities::{ReferenceEdge, SearchResult};
use anylink_core::enums::ReferenceKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A source object that produced at least one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedObject {
    pub object_id: String,
    pub name: String,
    pub space_id: Option<String>,
    /// Edges in the order they were recorded.
    pub edges: Vec<ReferenceEdge>,
}

/// Every edge observed in one run.
///
/// "Objects with links" is keyed by object id, so an object visited by both
/// sweeps is counted once. An edge identical in source, target, kind and
/// evidence to one already recorded is ignored.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    objects: Vec<LinkedObject>,
    index: HashMap<String, usize>,
    seen: HashSet<ReferenceEdge>,
    spaces: BTreeSet<String>,
}

impl LinkGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge from `source` to `target`. Returns `false` when the
    /// same edge was already present.
    pub fn record(
        &mut self,
        source: &SearchResult,
        target: &SearchResult,
        evidence: &str,
        kind: ReferenceKind,
    ) -> bool {
        let edge = ReferenceEdge {
            source_object_id: source.object_id.clone(),
            source_name: source.name.clone(),
            target_object_id: target.object_id.clone(),
            target_name: target.name.clone(),
            evidence: evidence.to_string(),
            kind,
        };
        if !self.seen.insert(edge.clone()) {
            return false;
        }

        if let Some(space) = &source.space_id {
            self.spaces.insert(space.clone());
        }
        let slot = match self.index.get(&source.object_id) {
            Some(&slot) => slot,
            None => {
                self.objects.push(LinkedObject {
                    object_id: source.object_id.clone(),
                    name: source.name.clone(),
                    space_id: source.space_id.clone(),
                    edges: Vec::new(),
                });
                let slot = self.objects.len() - 1;
                self.index.insert(source.object_id.clone(), slot);
                slot
            }
        };
        self.objects[slot].edges.push(edge);
        true
    }

    /// Linked objects in first-seen order.
    #[must_use]
    pub fn objects(&self) -> &[LinkedObject] {
        &self.objects
    }

    #[must_use]
    pub fn object(&self, object_id: &str) -> Option<&LinkedObject> {
        self.index.get(object_id).map(|&slot| &self.objects[slot])
    }

    /// Number of distinct objects with at least one edge.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.seen.len()
    }

    /// Every edge, grouped by source object in first-seen order.
    pub fn edges(&self) -> impl Iterator<Item = &ReferenceEdge> {
        self.objects.iter().flat_map(|object| object.edges.iter())
    }

    /// Distinct space ids of linked objects.
    #[must_use]
    pub const fn spaces(&self) -> &BTreeSet<String> {
        &self.spaces
    }

    /// Linked objects grouped under their space id. Objects without a space
    /// id are grouped under `None`, which sorts first.
    #[must_use]
    pub fn by_space(&self) -> BTreeMap<Option<&str>, Vec<&LinkedObject>> {
        let mut grouped: BTreeMap<Option<&str>, Vec<&LinkedObject>> = BTreeMap::new();
        for object in &self.objects {
            grouped.entry(object.space_id.as_deref()).or_default().push(object);
        }
        grouped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Serializable snapshot for output.
    #[must_use]
    pub fn report(&self, generated_at: DateTime<Utc>) -> LinkReport<'_> {
        LinkReport {
            generated_at,
            objects_with_links: self.object_count(),
            edges: self.edge_count(),
            spaces: self
                .by_space()
                .into_iter()
                .map(|(space_id, objects)| SpaceReport { space_id, objects })
                .collect(),
        }
    }
}

/// Output shape of a completed run.
#[derive(Debug, Serialize)]
pub struct LinkReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub objects_with_links: usize,
    pub edges: usize,
    pub spaces: Vec<SpaceReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SpaceReport<'a> {
    pub space_id: Option<&'a str>,
    pub objects: Vec<&'a LinkedObject>,
}

#[cfg(test)]
mod tests {
    use anylink_rpc::test_support::object;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn repeated_edge_is_recorded_once() {
        let source = object("obj-1", "Daily", "space-a", &[]);
        let target = object("obj-2", "Alpha", "space-a", &[]);
        let mut graph = LinkGraph::new();

        assert!(graph.record(&source, &target, "See [[Alpha]]", ReferenceKind::Bracket));
        assert!(!graph.record(&source, &target, "See [[Alpha]]", ReferenceKind::Bracket));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.object_count(), 1);
    }

    #[test]
    fn same_pair_from_other_sweep_or_snippet_is_a_new_edge() {
        let source = object("obj-1", "Daily", "space-a", &[]);
        let target = object("obj-2", "Alpha", "space-a", &[]);
        let mut graph = LinkGraph::new();

        graph.record(&source, &target, "See [[Alpha]]", ReferenceKind::Bracket);
        graph.record(&source, &target, "#Alpha", ReferenceKind::Hashtag);
        graph.record(&source, &target, "also [[Alpha]]", ReferenceKind::Bracket);

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.object_count(), 1);
        assert_eq!(graph.object("obj-1").map(|o| o.edges.len()), Some(3));
    }

    #[test]
    fn groups_objects_by_space() {
        let target = object("obj-t", "Target", "space-a", &[]);
        let mut graph = LinkGraph::new();
        graph.record(&object("obj-b", "B", "space-b", &[]), &target, "[[Target]]", ReferenceKind::Bracket);
        graph.record(&object("obj-a", "A", "space-a", &[]), &target, "[[Target]]", ReferenceKind::Bracket);
        graph.record(&object("obj-c", "C", "space-b", &[]), &target, "[[Target]]", ReferenceKind::Bracket);

        let grouped = graph.by_space();
        let view: Vec<(Option<&str>, Vec<&str>)> = grouped
            .iter()
            .map(|(space, objects)| (*space, objects.iter().map(|o| o.name.as_str()).collect()))
            .collect();
        assert_eq!(
            view,
            vec![(Some("space-a"), vec!["A"]), (Some("space-b"), vec!["B", "C"])]
        );
        assert_eq!(graph.spaces().len(), 2);
    }

    #[test]
    fn report_serializes_counts_and_groups() {
        let mut graph = LinkGraph::new();
        graph.record(
            &object("obj-1", "Daily", "space-a", &[]),
            &object("obj-2", "Alpha", "space-a", &[]),
            "See [[Alpha]]",
            ReferenceKind::Bracket,
        );

        let report = serde_json::to_value(graph.report(Utc::now())).unwrap();
        assert_eq!(report["objects_with_links"], 1);
        assert_eq!(report["edges"], 1);
        assert_eq!(report["spaces"][0]["space_id"], "space-a");
        assert_eq!(report["spaces"][0]["objects"][0]["edges"][0]["target_name"], "Alpha");
        assert_eq!(report["spaces"][0]["objects"][0]["edges"][0]["kind"], "bracket");
    }

    #[test]
    fn empty_graph() {
        let graph = LinkGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.edges().count(), 0);
        assert!(graph.by_space().is_empty());
    }
}
