//! Core graph data structure.
//!
//! `DependencyGraph` wraps petgraph and adds an id index. Node indexes are
//! handed out in catalog order and nothing is ever removed, so iterating by
//! index is iterating in catalog order. Every deterministic output in Grove
//! relies on that.

use crate::edge::Edge;
use grove_core::{Category, Importance, Node, RelationKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Index of a node in the graph.
pub type NodeId = NodeIndex;

/// The dependency graph.
///
/// Built once by [`crate::GraphBuilder`] and read-only afterwards: the
/// mutating methods are crate-private.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: DiGraph<Node, Edge>,

    /// Maps string ids to graph node indexes.
    id_index: HashMap<String, NodeId>,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.id_index.insert(id, index);
        index
    }

    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId, edge: Edge) {
        self.graph.add_edge(from, to, edge);
    }

    /// Gets a node by its string id.
    pub fn get_by_id(&self, id: &str) -> Option<&Node> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index)
    }

    /// Gets a node by its graph index.
    pub fn get(&self, index: NodeId) -> Option<&Node> {
        self.graph.node_weight(index)
    }

    /// Gets the node index for a string id.
    pub fn get_index(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges, self-loops included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterates over all nodes in catalog order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Iterates over all node indexes in catalog order.
    pub fn node_indexes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices()
    }

    /// Nodes `index` depends on, in catalog order.
    pub fn dependencies(&self, index: NodeId) -> Vec<NodeId> {
        self.neighbors_sorted(index, Direction::Outgoing)
    }

    /// Nodes that depend on `index`, in catalog order.
    pub fn dependents(&self, index: NodeId) -> Vec<NodeId> {
        self.neighbors_sorted(index, Direction::Incoming)
    }

    /// Ids of the nodes `id` depends on. Empty for unknown ids.
    pub fn dependency_ids(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Outgoing)
    }

    /// Ids of the nodes that depend on `id`. Empty for unknown ids.
    pub fn dependent_ids(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Incoming)
    }

    /// The relation kind recorded for `from -> to`, if that edge exists.
    pub fn relationship(&self, from: &str, to: &str) -> Option<RelationKind> {
        let from = self.get_index(from)?;
        let to = self.get_index(to)?;
        let edge = self.graph.find_edge(from, to)?;
        self.graph.edge_weight(edge).map(|e| e.kind)
    }

    /// Dependency count plus dependent count.
    pub fn degree(&self, index: NodeId) -> usize {
        self.graph.edges_directed(index, Direction::Outgoing).count()
            + self.graph.edges_directed(index, Direction::Incoming).count()
    }

    /// All edges ordered by source, then target, in catalog order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId, &Edge)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
            .collect();
        edges.sort_by_key(|(source, target, _)| (source.index(), target.index()));
        edges
    }

    /// Structural consistency problems, as human-readable messages.
    ///
    /// The builder never produces any; this exists so validation can
    /// check rather than assume.
    pub fn integrity_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for (id, index) in &self.id_index {
            match self.graph.node_weight(*index) {
                Some(node) if &node.id == id => {}
                Some(node) => violations.push(format!(
                    "id index maps '{}' to node '{}'",
                    id, node.id
                )),
                None => violations.push(format!("id index maps '{}' to a missing node", id)),
            }
        }
        if self.id_index.len() != self.graph.node_count() {
            violations.push(format!(
                "id index has {} entries for {} nodes",
                self.id_index.len(),
                self.graph.node_count()
            ));
        }

        let mut pairs = HashSet::new();
        for edge in self.graph.edge_references() {
            let (source, target) = (edge.source(), edge.target());
            let (Some(from), Some(to)) = (self.get(source), self.get(target)) else {
                violations.push(format!(
                    "edge {} -> {} has a missing endpoint",
                    source.index(),
                    target.index()
                ));
                continue;
            };
            if self.get_index(&to.id) != Some(target) {
                violations.push(format!(
                    "edge target '{}' of '{}' is not indexed",
                    to.id, from.id
                ));
            }
            if !pairs.insert((source, target)) {
                violations.push(format!(
                    "relationship '{}' -> '{}' is stored more than once",
                    from.id, to.id
                ));
            }
        }

        violations.sort();
        violations
    }

    fn neighbors_sorted(&self, index: NodeId, direction: Direction) -> Vec<NodeId> {
        let mut neighbors: Vec<NodeId> = self.graph.neighbors_directed(index, direction).collect();
        neighbors.sort_by_key(|n| n.index());
        neighbors.dedup();
        neighbors
    }

    fn neighbor_ids(&self, id: &str, direction: Direction) -> Vec<&str> {
        let Some(index) = self.get_index(id) else {
            return Vec::new();
        };
        self.neighbors_sorted(index, direction)
            .into_iter()
            .filter_map(|n| self.get(n).map(|node| node.id.as_str()))
            .collect()
    }
}

/// Aggregate counts for reports and the CLI summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_importance: BTreeMap<Importance, usize>,
}

impl DependencyGraph {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let mut by_category = BTreeMap::new();
        let mut by_importance = BTreeMap::new();
        for node in self.nodes() {
            *by_category.entry(node.category).or_insert(0) += 1;
            *by_importance.entry(node.importance).or_insert(0) += 1;
        }

        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            by_category,
            by_importance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_core::{Category, Importance};

    fn make_node(id: &str) -> Node {
        Node::new(id, format!("src/{}", id), Category::Source, Importance::Important)
    }

    fn edge() -> Edge {
        Edge::new(RelationKind::Depends)
    }

    #[test]
    fn test_neighbors_follow_catalog_order() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_node(make_node("a"));
        let b = graph.add_node(make_node("b"));
        let c = graph.add_node(make_node("c"));

        graph.add_edge(a, c, edge());
        graph.add_edge(a, b, edge());

        assert_eq!(graph.dependencies(a), vec![b, c]);
        assert_eq!(graph.dependency_ids("a"), vec!["b", "c"]);
        assert_eq!(graph.dependent_ids("c"), vec!["a"]);
        assert!(graph.dependency_ids("missing").is_empty());
    }

    #[test]
    fn test_degree_and_stats() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_node(make_node("a"));
        let b = graph.add_node(make_node("b"));
        graph.add_edge(a, b, edge());

        assert_eq!(graph.degree(a), 1);
        assert_eq!(graph.degree(b), 1);

        let stats = graph.stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.edge_count, 1);
        assert_eq!(stats.by_category.get(&Category::Source), Some(&2));
    }

    #[test]
    fn test_edges_sorted_by_catalog_order() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_node(make_node("a"));
        let b = graph.add_node(make_node("b"));
        let c = graph.add_node(make_node("c"));
        graph.add_edge(b, c, edge());
        graph.add_edge(a, c, edge());
        graph.add_edge(a, b, edge());

        let pairs: Vec<(String, String)> = graph
            .edges()
            .into_iter()
            .map(|(source, target, _)| {
                (
                    graph.get(source).unwrap().id.clone(),
                    graph.get(target).unwrap().id.clone(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_integrity_detects_parallel_edges() {
        let mut graph = DependencyGraph::new();
        let a = graph.add_node(make_node("a"));
        let b = graph.add_node(make_node("b"));
        graph.add_edge(a, b, edge());
        assert!(graph.integrity_violations().is_empty());

        graph.add_edge(a, b, edge());
        let violations = graph.integrity_violations();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("more than once"));
    }
}
