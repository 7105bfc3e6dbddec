//! Graph builder for constructing the dependency graph from a catalog.
//!
//! The builder validates the catalog up front, then runs two passes:
//! 1. Add a node for every retained entry
//! 2. Resolve declared relationships into edges
//!
//! Only a malformed catalog is fatal. Dangling, duplicate and self
//! relationships become [`BuildWarning`]s returned next to the graph.

use crate::edge::Edge;
use crate::graph::{DependencyGraph, NodeId};
use crate::warning::{BuildWarning, UnresolvedReason};
use grove_core::{Catalog, CatalogEntry, CatalogError, Node, RelationKind};
use std::collections::HashSet;
use tracing::{debug, info};

/// A built graph plus everything worth telling the user about it.
#[derive(Debug)]
pub struct BuildOutcome {
    pub graph: DependencyGraph,
    pub warnings: Vec<BuildWarning>,
}

/// A relationship waiting for pass 2.
struct PendingEdge {
    from: NodeId,
    target: String,
    kind: RelationKind,
}

/// Builds a [`DependencyGraph`] from catalog entries.
///
/// Call `add_entries` for each batch of entries, then `build` once all
/// entries are known so relationships can point forward in the catalog.
pub struct GraphBuilder {
    graph: DependencyGraph,
    /// Ids of excluded entries, so dangling targets can say why.
    excluded: HashSet<String>,
    pending: Vec<PendingEdge>,
    warnings: Vec<BuildWarning>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::new(),
            excluded: HashSet::new(),
            pending: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds catalog entries as nodes.
    ///
    /// The whole batch is checked before anything is added, so on error the
    /// builder is left as it was.
    pub fn add_entries(&mut self, entries: &[CatalogEntry]) -> Result<(), CatalogError> {
        self.check_entries(entries)?;

        for entry in entries {
            if !entry.importance.is_retained() {
                debug!("excluding '{}' from the graph", entry.id);
                self.excluded.insert(entry.id.clone());
                continue;
            }

            let index = self.graph.add_node(Node::from_entry(entry));
            self.pending.extend(entry.relationships.iter().map(|rel| PendingEdge {
                from: index,
                target: rel.target.clone(),
                kind: rel.kind,
            }));
        }

        Ok(())
    }

    /// Rejects missing ids, missing paths and ids seen before.
    fn check_entries(&self, entries: &[CatalogEntry]) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        let offset = self.graph.node_count() + self.excluded.len();

        for (position, entry) in entries.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::MissingId {
                    index: offset + position,
                });
            }
            if entry.path.trim().is_empty() {
                return Err(CatalogError::MissingPath {
                    id: entry.id.clone(),
                });
            }
            let known = self.graph.contains(&entry.id) || self.excluded.contains(&entry.id);
            if known || !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: entry.id.clone(),
                });
            }
        }

        Ok(())
    }

    /// Resolves pending relationships into edges.
    ///
    /// Relationships are processed in declaration order, so for duplicates
    /// the first declared kind is the one kept.
    fn resolve_edges(&mut self) {
        for pending in std::mem::take(&mut self.pending) {
            let Some(source) = self.graph.get(pending.from).map(|n| n.id.clone()) else {
                continue;
            };

            let Some(to) = self.graph.get_index(&pending.target) else {
                let reason = if self.excluded.contains(&pending.target) {
                    UnresolvedReason::Excluded
                } else {
                    UnresolvedReason::Missing
                };
                self.warn(BuildWarning::UnresolvedRelationship {
                    source,
                    target: pending.target,
                    reason,
                });
                continue;
            };

            if let Some(existing) = self.graph.graph.find_edge(pending.from, to) {
                let kept = self.graph.graph[existing].kind;
                self.warn(BuildWarning::DuplicateRelationship {
                    source,
                    target: pending.target,
                    kept,
                    ignored: pending.kind,
                });
                continue;
            }

            if pending.from == to {
                self.warn(BuildWarning::SelfLoop { node: source });
            }

            self.graph.add_edge(pending.from, to, Edge::new(pending.kind));
        }
    }

    fn warn(&mut self, warning: BuildWarning) {
        debug!("{}: {}", warning.code(), warning);
        self.warnings.push(warning);
    }

    /// Finishes building and returns the graph with its warnings.
    pub fn build(mut self) -> BuildOutcome {
        self.resolve_edges();

        info!(
            "built dependency graph: {} nodes, {} edges, {} excluded, {} warnings",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.excluded.len(),
            self.warnings.len()
        );

        BuildOutcome {
            graph: self.graph,
            warnings: self.warnings,
        }
    }
}

/// Builds a graph from an ordered list of catalog entries.
pub fn build_graph(entries: &[CatalogEntry]) -> Result<BuildOutcome, CatalogError> {
    let mut builder = GraphBuilder::new();
    builder.add_entries(entries)?;
    Ok(builder.build())
}

/// Builds a graph from a catalog snapshot.
pub fn build_catalog(catalog: &Catalog) -> Result<BuildOutcome, CatalogError> {
    build_graph(catalog.entries())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::{Category, Importance};

    fn entry(id: &str) -> CatalogEntry {
        CatalogEntry::new(id, format!("packages/{}", id), Category::Package, Importance::Important)
    }

    fn assert_symmetric(graph: &DependencyGraph) {
        for node in graph.nodes() {
            for dep in graph.dependency_ids(&node.id) {
                assert!(graph.contains(dep), "dangling dependency {}", dep);
                assert!(graph.dependent_ids(dep).contains(&node.id.as_str()));
            }
            for dependent in graph.dependent_ids(&node.id) {
                assert!(graph.contains(dependent), "dangling dependent {}", dependent);
                assert!(graph.dependency_ids(dependent).contains(&node.id.as_str()));
            }
        }
    }

    #[test]
    fn test_builder_adds_nodes() {
        let outcome = build_graph(&[entry("foo"), entry("bar")]).unwrap();

        assert_eq!(outcome.graph.node_count(), 2);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_builder_resolves_edges() {
        let entries = vec![
            entry("app").with_relationship("lib", RelationKind::Imports),
            entry("lib"),
        ];
        let outcome = build_graph(&entries).unwrap();
        let graph = &outcome.graph;

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dependency_ids("app"), vec!["lib"]);
        assert_eq!(graph.dependent_ids("lib"), vec!["app"]);
        assert_eq!(graph.relationship("app", "lib"), Some(RelationKind::Imports));
        assert_symmetric(graph);
    }

    #[test]
    fn test_unresolved_target_is_a_warning() {
        let entries = vec![
            entry("a").depends_on(["b", "ghost"]),
            entry("b").depends_on(["c"]),
            entry("c"),
        ];
        let outcome = build_graph(&entries).unwrap();

        assert_eq!(outcome.graph.node_count(), 3);
        assert_eq!(outcome.graph.edge_count(), 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code(), "unresolved-relationship");
        assert_eq!(
            outcome.warnings[0],
            BuildWarning::UnresolvedRelationship {
                source: "a".to_string(),
                target: "ghost".to_string(),
                reason: UnresolvedReason::Missing,
            }
        );
        assert_symmetric(&outcome.graph);
    }

    #[test]
    fn test_duplicate_keeps_first_kind() {
        let entries = vec![
            entry("a")
                .with_relationship("b", RelationKind::Imports)
                .with_relationship("b", RelationKind::Extends),
            entry("b"),
        ];
        let outcome = build_graph(&entries).unwrap();

        assert_eq!(outcome.graph.edge_count(), 1);
        assert_eq!(
            outcome.graph.relationship("a", "b"),
            Some(RelationKind::Imports)
        );
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code(), "duplicate-relationship");
    }

    #[test]
    fn test_self_loop_is_kept_and_flagged() {
        let outcome = build_graph(&[entry("a").depends_on(["a"])]).unwrap();

        assert_eq!(outcome.graph.edge_count(), 1);
        assert_eq!(outcome.graph.dependency_ids("a"), vec!["a"]);
        assert_eq!(outcome.graph.dependent_ids("a"), vec!["a"]);
        assert_eq!(
            outcome.warnings,
            vec![BuildWarning::SelfLoop {
                node: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_excluded_entries_are_omitted() {
        let hidden = CatalogEntry::new("old", "legacy/old", Category::Source, Importance::Excluded)
            .depends_on(["a"]);
        let entries = vec![entry("a").depends_on(["old"]), hidden];
        let outcome = build_graph(&entries).unwrap();

        assert_eq!(outcome.graph.node_count(), 1);
        assert!(!outcome.graph.contains("old"));
        assert_eq!(outcome.graph.edge_count(), 0);
        assert_eq!(
            outcome.warnings,
            vec![BuildWarning::UnresolvedRelationship {
                source: "a".to_string(),
                target: "old".to_string(),
                reason: UnresolvedReason::Excluded,
            }]
        );
    }

    #[test]
    fn test_missing_id_is_fatal() {
        let mut bad = entry("x");
        bad.id = String::new();
        let err = build_graph(&[entry("a"), bad]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingId { index: 1 }));
    }

    #[test]
    fn test_missing_path_is_fatal() {
        let mut bad = entry("x");
        bad.path = "  ".to_string();
        let err = build_graph(&[bad]).unwrap_err();
        assert!(matches!(err, CatalogError::MissingPath { id } if id == "x"));
    }

    #[test]
    fn test_duplicate_id_is_fatal() {
        let err = build_graph(&[entry("a"), entry("a")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id } if id == "a"));
    }

    #[test]
    fn test_batches_can_reference_later_batches() {
        let mut builder = GraphBuilder::new();
        builder.add_entries(&[entry("app").depends_on(["lib"])]).unwrap();
        builder.add_entries(&[entry("lib")]).unwrap();

        let outcome = builder.build();
        assert_eq!(outcome.graph.edge_count(), 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_failed_batch_leaves_builder_untouched() {
        let mut builder = GraphBuilder::new();
        builder.add_entries(&[entry("a")]).unwrap();
        assert!(builder.add_entries(&[entry("b"), entry("a")]).is_err());

        let outcome = builder.build();
        assert_eq!(outcome.graph.node_count(), 1);
    }

    #[test]
    fn test_nodes_keep_catalog_order() {
        let outcome = build_graph(&[entry("zeta"), entry("alpha"), entry("mid")]).unwrap();
        let ids: Vec<&str> = outcome.graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }
}
