//! Edge types for the dependency graph.
//!
//! Edges live in the graph's adjacency structure. There is no separate edge
//! list.

use grove_core::RelationKind;
use serde::{Deserialize, Serialize};

/// Weight stored on every dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The kind of relationship, from the first declaration.
    pub kind: RelationKind,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(kind: RelationKind) -> Self {
        Self { kind }
    }
}
