//! Grove Graph - dependency graph construction and analysis
//!
//! This crate turns a catalog into a validated dependency graph and runs
//! the structural analyzers over it:
//! - [`find_cycles`]: dependency cycles, deduplicated by canonical rotation
//! - [`find_longest_chains`]: deepest dependency stacks
//! - [`validate`]: isolated nodes, most-connected nodes, errors and warnings
//!
//! # Architecture
//!
//! The graph uses petgraph internally with an id index on top. Node indexes
//! follow catalog order, which every analyzer and renderer relies on for
//! deterministic output. The graph is immutable once built; analyzers only
//! borrow it, so they can run in any order or in parallel.
//!
//! # Example
//!
//! ```
//! use grove_core::{CatalogEntry, Category, Importance};
//! use grove_graph::{build_graph, find_cycles, find_longest_chains};
//!
//! let outcome = build_graph(&[
//!     CatalogEntry::new("app", "apps/app", Category::Source, Importance::Critical)
//!         .depends_on(["lib"]),
//!     CatalogEntry::new("lib", "packages/lib", Category::Package, Importance::Important),
//! ])
//! .unwrap();
//!
//! assert!(find_cycles(&outcome.graph).is_empty());
//! assert_eq!(find_longest_chains(&outcome.graph, 1)[0].len(), 2);
//! ```

mod analysis;
mod builder;
mod chains;
mod connectivity;
mod cycles;
mod edge;
mod graph;
mod warning;

pub use analysis::{AnalysisOptions, AnalysisResults};
pub use builder::{build_catalog, build_graph, BuildOutcome, GraphBuilder};
pub use chains::{find_longest_chains, Chain};
pub use connectivity::{
    validate, ConnectivityReport, Diagnostic, DiagnosticCode, Severity, ValidationOptions,
};
pub use cycles::{find_cycles, Cycle};
pub use edge::Edge;
pub use graph::{DependencyGraph, GraphStats, NodeId};
pub use warning::{BuildWarning, UnresolvedReason};
