//! Node metadata shared by every stage of the pipeline.
//!
//! Categories, importance tiers and relationship kinds are closed enums so
//! that anything matching on them (style classes, rollup grouping, report
//! sections) is checked for exhaustiveness by the compiler.

use crate::catalog::CatalogEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of directory or package a catalog entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Application or library source code.
    Source,
    /// A reusable package published inside the monorepo.
    Package,
    /// A deployable backend service.
    Service,
    /// Scripts, linters and other developer tooling.
    Tooling,
    /// Docs, guides and reference material.
    Documentation,
    /// Test suites and fixtures.
    Testing,
    /// Shared configuration.
    Configuration,
    /// Deployment, CI and infrastructure definitions.
    Infrastructure,
    /// Research code and prototypes.
    Experimental,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 9] = [
        Category::Source,
        Category::Package,
        Category::Service,
        Category::Tooling,
        Category::Documentation,
        Category::Testing,
        Category::Configuration,
        Category::Infrastructure,
        Category::Experimental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Package => "package",
            Self::Service => "service",
            Self::Tooling => "tooling",
            Self::Documentation => "documentation",
            Self::Testing => "testing",
            Self::Configuration => "configuration",
            Self::Infrastructure => "infrastructure",
            Self::Experimental => "experimental",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Importance tier of a catalog entry.
///
/// Variants are declared lowest first so the derived ordering reads
/// `Critical > Important > Optional > Excluded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    /// Dropped from the graph entirely.
    Excluded,
    Optional,
    Important,
    Critical,
}

impl Importance {
    /// Tiers that can appear in a built graph, most important first.
    pub const RETAINED: [Importance; 3] = [
        Importance::Critical,
        Importance::Important,
        Importance::Optional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excluded => "excluded",
            Self::Optional => "optional",
            Self::Important => "important",
            Self::Critical => "critical",
        }
    }

    /// Whether entries of this tier are kept when building the graph.
    pub fn is_retained(&self) -> bool {
        !matches!(self, Self::Excluded)
    }
}

impl Default for Importance {
    fn default() -> Self {
        Self::Optional
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "important" => Ok(Self::Important),
            "optional" => Ok(Self::Optional),
            "excluded" => Ok(Self::Excluded),
            other => Err(format!("unknown importance tier '{}'", other)),
        }
    }
}

/// The kind of relationship a dependency edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Source files import from the target.
    Imports,
    /// Generic declared dependency.
    Depends,
    /// Builds on top of the target (base config, parent package).
    Extends,
    /// Implements an interface or protocol the target defines.
    Implements,
    /// Uses the target at runtime.
    Uses,
    /// Provides configuration for the target.
    Configures,
    /// Documents the target.
    Documents,
    /// Tests the target.
    Tests,
}

impl Default for RelationKind {
    fn default() -> Self {
        Self::Depends
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Imports => "imports",
            Self::Depends => "depends",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::Uses => "uses",
            Self::Configures => "configures",
            Self::Documents => "documents",
            Self::Tests => "tests",
        };
        write!(f, "{}", s)
    }
}

/// A node in the dependency graph: one retained catalog entry.
///
/// Adjacency (dependencies, dependents, relation kinds) lives in the graph,
/// not on the node, so the two directions can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Stable unique identifier.
    pub id: String,
    /// Short human-readable name.
    pub label: String,
    /// Catalog path the entry was derived from.
    pub path: String,
    pub category: Category,
    /// Grouping inside the category, used by rollup diagrams.
    pub subcategory: String,
    pub importance: Importance,
}

impl Node {
    /// Creates a node with a label and subcategory derived from `path`.
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        category: Category,
        importance: Importance,
    ) -> Self {
        let path = path.into();
        Self {
            id: id.into(),
            label: last_segment(&path).to_string(),
            subcategory: first_segment(&path).to_string(),
            path,
            category,
            importance,
        }
    }

    /// Builds the node for a catalog entry.
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        let mut node = Self::new(&entry.id, &entry.path, entry.category, entry.importance);
        if let Some(label) = entry.label.as_deref().filter(|l| !l.trim().is_empty()) {
            node.label = label.to_string();
        }
        if let Some(sub) = entry.subcategory.as_deref().filter(|s| !s.trim().is_empty()) {
            node.subcategory = sub.to_string();
        }
        node
    }
}

fn segments(path: &str) -> impl DoubleEndedIterator<Item = &str> {
    path.split(|c: char| c == '/' || c == '\\').filter(|s| !s.is_empty() && *s != ".")
}

fn last_segment(path: &str) -> &str {
    segments(path).next_back().unwrap_or(path)
}

fn first_segment(path: &str) -> &str {
    segments(path).next().unwrap_or(path)
}
