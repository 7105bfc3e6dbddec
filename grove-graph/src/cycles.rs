//! Cycle detection.
//!
//! Depth-first search from every unvisited node, with an explicit frame
//! stack instead of recursion. Reaching a node that is still on the stack
//! closes a cycle: the stack slice from that node to the current one.
//!
//! Cycles are stored in canonical rotation (the lexicographically smallest
//! rotation of their id sequence) so the same cycle found from two entry
//! points is reported once. Self-loops are not cycles here; the builder
//! already flags them.

use crate::graph::{DependencyGraph, NodeId};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A dependency cycle of two or more distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Cycle {
    nodes: Vec<String>,
}

impl Cycle {
    /// Creates a cycle from a closed walk, rotated into canonical form.
    ///
    /// `nodes` must not repeat the first node at the end.
    pub fn new(nodes: Vec<String>) -> Self {
        Self {
            nodes: canonical_rotation(nodes),
        }
    }

    /// Node ids in canonical order. The last node depends on the first.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n == id)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{} -> ", node)?;
        }
        match self.nodes.first() {
            Some(first) => write!(f, "{}", first),
            None => Ok(()),
        }
    }
}

/// The lexicographically smallest rotation of `nodes`.
fn canonical_rotation(nodes: Vec<String>) -> Vec<String> {
    let len = nodes.len();
    let best = (0..len)
        .min_by(|&a, &b| {
            let rot_a = nodes[a..].iter().chain(&nodes[..a]);
            let rot_b = nodes[b..].iter().chain(&nodes[..b]);
            rot_a.cmp(rot_b)
        })
        .unwrap_or(0);

    let mut rotated = nodes;
    rotated.rotate_left(best);
    rotated
}

/// One level of the DFS: a node and how far through its neighbors we are.
struct Frame {
    node: NodeId,
    neighbors: Vec<NodeId>,
    cursor: usize,
}

impl Frame {
    fn new(node: NodeId, graph: &DependencyGraph) -> Self {
        Self {
            node,
            neighbors: graph.dependencies(node),
            cursor: 0,
        }
    }

    fn advance(&mut self) -> Option<NodeId> {
        let next = self.neighbors.get(self.cursor).copied();
        self.cursor += 1;
        next
    }
}

/// Finds dependency cycles.
///
/// Roots and neighbors are visited in catalog order, so the result order
/// is deterministic. An empty result is the healthy case.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let count = graph.node_count();
    let mut visited = vec![false; count];
    // Position of each node in `frames` while it is on the stack.
    let mut stack_pos: Vec<Option<usize>> = vec![None; count];
    let mut seen: HashSet<Cycle> = HashSet::new();
    let mut cycles = Vec::new();

    for root in graph.node_indexes() {
        if visited[root.index()] {
            continue;
        }

        visited[root.index()] = true;
        stack_pos[root.index()] = Some(0);
        let mut frames = vec![Frame::new(root, graph)];

        while let Some(frame) = frames.last_mut() {
            let current = frame.node;
            let Some(next) = frame.advance() else {
                stack_pos[current.index()] = None;
                frames.pop();
                continue;
            };

            if next == current {
                continue;
            }

            if let Some(pos) = stack_pos[next.index()] {
                let walk: Vec<String> = frames[pos..]
                    .iter()
                    .filter_map(|f| graph.get(f.node).map(|n| n.id.clone()))
                    .collect();
                let cycle = Cycle::new(walk);
                if seen.insert(cycle.clone()) {
                    tracing::debug!("found cycle {}", cycle);
                    cycles.push(cycle);
                }
            } else if !visited[next.index()] {
                visited[next.index()] = true;
                stack_pos[next.index()] = Some(frames.len());
                frames.push(Frame::new(next, graph));
            }
        }
    }

    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_graph;
    use grove_core::{CatalogEntry, Category, Importance};

    fn graph_from(edges: &[(&str, &str)], nodes: &[&str]) -> DependencyGraph {
        let entries: Vec<CatalogEntry> = nodes
            .iter()
            .map(|id| {
                let targets = edges.iter().filter(|(from, _)| from == id).map(|(_, to)| *to);
                CatalogEntry::new(*id, *id, Category::Source, Importance::Important)
                    .depends_on(targets)
            })
            .collect();
        build_graph(&entries).unwrap().graph
    }

    #[test]
    fn test_cycle_detection_logic() {
        let cases = vec![
            (vec![("a", "b"), ("b", "c")], 0, "No cycles"),
            (vec![("a", "b"), ("b", "a")], 1, "Simple cycle"),
            (
                vec![("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
                0,
                "Diamond DAG (no cycle)",
            ),
            (vec![("a", "a")], 0, "Self loop is not a cycle"),
            (vec![("a", "b"), ("b", "c"), ("c", "a")], 1, "Three node cycle"),
            (
                vec![("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")],
                2,
                "Disjoint cycles",
            ),
            (
                vec![("a", "b"), ("b", "a"), ("b", "c"), ("c", "b")],
                2,
                "Figure-8 (shared node)",
            ),
            (
                vec![("a", "b"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "a")],
                1,
                "Long cycle (5 nodes)",
            ),
            (vec![], 0, "Empty graph"),
        ];

        for (edge_list, expected, desc) in cases {
            let graph = graph_from(&edge_list, &["a", "b", "c", "d", "e"]);
            let cycles = find_cycles(&graph);
            assert_eq!(cycles.len(), expected, "Failed: {desc}");
            assert!(cycles.iter().all(|c| c.len() >= 2), "Failed: {desc}");
        }
    }

    #[test]
    fn test_three_node_fixture() {
        let graph = graph_from(&[("A", "B"), ("B", "C"), ("C", "A")], &["A", "B", "C"]);
        let cycles = find_cycles(&graph);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes(), ["A", "B", "C"]);
        assert_eq!(cycles[0].to_string(), "A -> B -> C -> A");

        let acyclic = graph_from(&[("A", "B"), ("B", "C")], &["A", "B", "C"]);
        assert!(find_cycles(&acyclic).is_empty());
    }

    #[test]
    fn test_rotations_are_deduplicated() {
        // Both entry points reach the same cycle; only one survives.
        let graph = graph_from(
            &[("x", "b"), ("y", "c"), ("b", "c"), ("c", "b")],
            &["x", "y", "b", "c"],
        );
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes(), ["b", "c"]);
    }

    #[test]
    fn test_canonical_rotation() {
        let ids = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(Cycle::new(ids(&["c", "a", "b"])).nodes(), ["a", "b", "c"]);
        assert_eq!(Cycle::new(ids(&["b", "c", "a"])), Cycle::new(ids(&["a", "b", "c"])));
        assert_ne!(Cycle::new(ids(&["a", "c", "b"])), Cycle::new(ids(&["a", "b", "c"])));
    }

    #[test]
    fn test_cycle_behind_self_loop() {
        let graph = graph_from(&[("a", "a"), ("a", "b"), ("b", "a")], &["a", "b"]);
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].contains("a"));
        assert!(cycles[0].contains("b"));
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let ids: Vec<String> = (0..5000).map(|i| format!("n{i}")).collect();
        let entries: Vec<CatalogEntry> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let entry = CatalogEntry::new(id, id, Category::Source, Importance::Optional);
                match ids.get(i + 1) {
                    Some(next) => entry.depends_on([next.clone()]),
                    None => entry.depends_on([ids[0].clone()]),
                }
            })
            .collect();
        let graph = build_graph(&entries).unwrap().graph;

        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 5000);
    }
}
