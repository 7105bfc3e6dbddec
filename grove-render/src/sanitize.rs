//! Diagram identifier sanitization.

use std::collections::{HashMap, HashSet};

/// Words Mermaid's flowchart parser treats specially when used as node ids.
const RESERVED: &[&str] = &[
    "end",
    "graph",
    "flowchart",
    "subgraph",
    "class",
    "classDef",
    "click",
    "style",
    "linkStyle",
    "direction",
    "default",
];

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
///
/// Idempotent: the output only contains allowed characters. Empty input
/// becomes `_` so every node has an id.
pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() {
        return "_".to_string();
    }
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Hands out unique diagram ids for the lifetime of one render.
///
/// The same input always maps to the same id. Distinct inputs that
/// sanitize to the same string (or to a reserved word) get `_2`, `_3`, ...
/// suffixes in the order they are first seen.
#[derive(Debug, Default)]
pub struct IdAllocator {
    assigned: HashMap<String, String>,
    taken: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the diagram id for `raw`, allocating one on first use.
    pub fn id_for(&mut self, raw: &str) -> String {
        if let Some(id) = self.assigned.get(raw) {
            return id.clone();
        }

        let base = sanitize(raw);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while RESERVED.contains(&candidate.as_str()) || self.taken.contains(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }

        self.taken.insert(candidate.clone());
        self.assigned.insert(raw.to_string(), candidate.clone());
        candidate
    }
}
