//! Longest dependency chains.
//!
//! For each start candidate we follow the longest path along dependency
//! edges, memoizing the best length per node. A neighbor that is already on
//! the current path is treated as a dead end, which keeps the search linear
//! and terminating on cyclic graphs. On cyclic input the result is
//! therefore an approximation of the longest simple path, not the exact
//! value. Chains are for reporting "deepest stacks", nothing more.

use crate::graph::{DependencyGraph, NodeId};
use serde::Serialize;
use std::fmt;

/// An ordered run of nodes where each depends directly on the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chain {
    nodes: Vec<String>,
}

impl Chain {
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nodes.join(" -> "))
    }
}

/// Best path found from a node: its length and the next hop.
#[derive(Debug, Clone, Copy)]
struct Best {
    len: usize,
    next: Option<NodeId>,
}

struct Frame {
    node: NodeId,
    neighbors: Vec<NodeId>,
    cursor: usize,
    best: Best,
}

impl Frame {
    fn new(node: NodeId, graph: &DependencyGraph) -> Self {
        Self {
            node,
            neighbors: graph.dependencies(node),
            cursor: 0,
            best: Best { len: 1, next: None },
        }
    }

    /// Takes `candidate` as the next hop if it gives a strictly longer path.
    /// Strictness keeps the earliest neighbor in catalog order on ties.
    fn offer(&mut self, candidate: NodeId, len: usize) {
        if len + 1 > self.best.len {
            self.best = Best {
                len: len + 1,
                next: Some(candidate),
            };
        }
    }
}

struct ChainSearch<'a> {
    graph: &'a DependencyGraph,
    memo: Vec<Option<Best>>,
    on_path: Vec<bool>,
}

impl<'a> ChainSearch<'a> {
    fn new(graph: &'a DependencyGraph) -> Self {
        let count = graph.node_count();
        Self {
            graph,
            memo: vec![None; count],
            on_path: vec![false; count],
        }
    }

    fn is_done(&self, node: NodeId) -> bool {
        self.memo[node.index()].is_some()
    }

    /// Fills the memo for every node reachable from `start`.
    fn explore(&mut self, start: NodeId) {
        if self.is_done(start) {
            return;
        }

        self.on_path[start.index()] = true;
        let mut frames = vec![Frame::new(start, self.graph)];

        while let Some(frame) = frames.last_mut() {
            let Some(&next) = frame.neighbors.get(frame.cursor) else {
                let finished = frame.node;
                let best = frame.best;
                frames.pop();

                self.on_path[finished.index()] = false;
                self.memo[finished.index()] = Some(best);
                if let Some(parent) = frames.last_mut() {
                    parent.offer(finished, best.len);
                }
                continue;
            };
            frame.cursor += 1;

            if self.on_path[next.index()] {
                continue;
            }
            match self.memo[next.index()] {
                Some(done) => frame.offer(next, done.len),
                None => {
                    self.on_path[next.index()] = true;
                    frames.push(Frame::new(next, self.graph));
                }
            }
        }
    }

    /// Follows memoized next hops from `start`.
    ///
    /// A node's next hop always finished before it did, so the walk never
    /// revisits a node.
    fn chain_from(&self, start: NodeId) -> Chain {
        let mut nodes = Vec::new();
        let mut current = Some(start);

        while let Some(node) = current {
            if nodes.len() >= self.memo.len() {
                break;
            }
            if let Some(n) = self.graph.get(node) {
                nodes.push(n.id.clone());
            }
            current = self.memo[node.index()].and_then(|best| best.next);
        }

        Chain { nodes }
    }
}

/// Nodes nothing else depends on. A self-loop does not count as a dependent.
fn roots(graph: &DependencyGraph) -> Vec<NodeId> {
    graph
        .node_indexes()
        .filter(|&n| graph.dependents(n).iter().all(|&d| d == n))
        .collect()
}

/// Finds the longest dependency chains, longest first.
///
/// Start candidates are the roots in catalog order, followed by any node
/// not reachable from an earlier start (nodes inside root-less cycles).
/// Equal-length chains are ordered by the catalog position of their start
/// node. `limit == 0` returns all.
pub fn find_longest_chains(graph: &DependencyGraph, limit: usize) -> Vec<Chain> {
    let mut search = ChainSearch::new(graph);
    let mut starts = Vec::new();

    for root in roots(graph) {
        search.explore(root);
        starts.push(root);
    }
    for node in graph.node_indexes() {
        if !search.is_done(node) {
            search.explore(node);
            starts.push(node);
        }
    }

    starts.sort_by_key(|n| n.index());
    let mut chains: Vec<Chain> = starts.into_iter().map(|s| search.chain_from(s)).collect();
    chains.sort_by(|a, b| b.len().cmp(&a.len()));
    if limit > 0 {
        chains.truncate(limit);
    }

    tracing::debug!(
        "found {} chains, longest {}",
        chains.len(),
        chains.first().map(Chain::len).unwrap_or(0)
    );
    chains
}
