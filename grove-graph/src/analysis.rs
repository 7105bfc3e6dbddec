//! Runs every structural analyzer over one graph.

use crate::chains::{find_longest_chains, Chain};
use crate::connectivity::{validate, ConnectivityReport, ValidationOptions};
use crate::cycles::{find_cycles, Cycle};
use crate::graph::DependencyGraph;
use crate::warning::BuildWarning;
use grove_core::AnalysisConfig;
use serde::Serialize;

/// Knobs for a full analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub strict: bool,
    /// Maximum chains kept (0 = unlimited).
    pub chain_limit: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            strict: false,
            chain_limit: 10,
        }
    }
}

impl From<&AnalysisConfig> for AnalysisOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            strict: config.strict,
            chain_limit: config.chain_limit,
        }
    }
}

impl AnalysisOptions {
    pub fn validation(&self) -> ValidationOptions {
        ValidationOptions {
            strict: self.strict,
        }
    }
}

/// Everything the analyzers found, ready for rendering.
///
/// The analyzers are independent and read-only, so they can also be run
/// separately (even concurrently) and assembled with [`AnalysisResults::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResults {
    pub build_warnings: Vec<BuildWarning>,
    pub cycles: Vec<Cycle>,
    pub chains: Vec<Chain>,
    pub connectivity: ConnectivityReport,
}

impl AnalysisResults {
    pub fn new(
        build_warnings: Vec<BuildWarning>,
        cycles: Vec<Cycle>,
        chains: Vec<Chain>,
        connectivity: ConnectivityReport,
    ) -> Self {
        Self {
            build_warnings,
            cycles,
            chains,
            connectivity,
        }
    }

    /// Runs the analyzers one after another.
    pub fn run(
        graph: &DependencyGraph,
        build_warnings: Vec<BuildWarning>,
        options: &AnalysisOptions,
    ) -> Self {
        let cycles = find_cycles(graph);
        let chains = find_longest_chains(graph, options.chain_limit);
        let connectivity = validate(graph, &options.validation());
        Self::new(build_warnings, cycles, chains, connectivity)
    }

    /// True when nothing escalated to an error.
    pub fn is_healthy(&self) -> bool {
        self.connectivity.is_healthy()
    }
}
