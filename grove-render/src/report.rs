//! Markdown report generation.
//!
//! Pure formatting over analyzer output. Nothing here re-runs an analysis;
//! the only numbers computed are plain counts over the graph.

use grove_core::{Category, Importance};
use grove_graph::{AnalysisResults, DependencyGraph, Diagnostic};
use std::fmt::Write;

/// Report layout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub title: String,
    /// How many most-connected nodes to list.
    pub top_n: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Dependency Report".to_string(),
            top_n: 10,
        }
    }
}

/// Renders the report.
pub fn generate(graph: &DependencyGraph, results: &AnalysisResults, options: &ReportOptions) -> String {
    let mut out = String::with_capacity(2048);
    let _ = writeln!(out, "# {}", options.title);

    write_summary(&mut out, graph, results);
    write_most_connected(&mut out, results, options.top_n);
    write_chains(&mut out, results);
    write_cycles(&mut out, results);
    write_isolated(&mut out, results);
    write_build_warnings(&mut out, results);
    write_diagnostics(&mut out, "Validation Errors", &results.connectivity.errors);
    write_diagnostics(&mut out, "Validation Warnings", &results.connectivity.warnings);

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", title);
    let _ = writeln!(out);
}

fn write_summary(out: &mut String, graph: &DependencyGraph, results: &AnalysisResults) {
    let stats = graph.stats();
    let connectivity = &results.connectivity;

    section(out, "Summary");
    let _ = writeln!(out, "- Nodes: {}", stats.node_count);
    let _ = writeln!(out, "- Edges: {}", stats.edge_count);
    let _ = writeln!(out, "- Cycles: {}", results.cycles.len());
    let _ = writeln!(out, "- Isolated nodes: {}", connectivity.isolated.len());
    let _ = writeln!(out, "- Build warnings: {}", results.build_warnings.len());
    let _ = writeln!(
        out,
        "- Validation: {} ({} errors, {} warnings)",
        if connectivity.is_healthy() { "passed" } else { "failed" },
        connectivity.errors.len(),
        connectivity.warnings.len()
    );

    if stats.by_category.is_empty() {
        return;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "| Category | Nodes |");
    let _ = writeln!(out, "|----------|-------|");
    for category in Category::ALL {
        if let Some(count) = stats.by_category.get(&category) {
            let _ = writeln!(out, "| {} | {} |", category, count);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "| Importance | Nodes |");
    let _ = writeln!(out, "|------------|-------|");
    for tier in Importance::RETAINED {
        if let Some(count) = stats.by_importance.get(&tier) {
            let _ = writeln!(out, "| {} | {} |", tier, count);
        }
    }
}

fn write_most_connected(out: &mut String, results: &AnalysisResults, top_n: usize) {
    section(out, "Most Connected");
    let top = results.connectivity.top(top_n);
    if top.is_empty() {
        let _ = writeln!(out, "No nodes.");
        return;
    }
    for (rank, (id, degree)) in top.iter().enumerate() {
        let _ = writeln!(out, "{}. `{}` (degree {})", rank + 1, id, degree);
    }
}

fn write_chains(out: &mut String, results: &AnalysisResults) {
    section(out, "Longest Chains");
    if results.chains.is_empty() {
        let _ = writeln!(out, "No chains.");
        return;
    }
    for (rank, chain) in results.chains.iter().enumerate() {
        let _ = writeln!(out, "{}. {} (length {})", rank + 1, chain, chain.len());
    }
}

fn write_cycles(out: &mut String, results: &AnalysisResults) {
    section(out, "Cycles");
    if results.cycles.is_empty() {
        let _ = writeln!(out, "None detected.");
        return;
    }
    for cycle in &results.cycles {
        let _ = writeln!(out, "- {}", cycle);
    }
}

fn write_isolated(out: &mut String, results: &AnalysisResults) {
    section(out, "Isolated Nodes");
    let isolated = &results.connectivity.isolated;
    if isolated.is_empty() {
        let _ = writeln!(out, "None.");
        return;
    }
    for id in isolated {
        let _ = writeln!(out, "- `{}`", id);
    }
}

fn write_build_warnings(out: &mut String, results: &AnalysisResults) {
    if results.build_warnings.is_empty() {
        return;
    }
    section(out, "Build Warnings");
    for warning in &results.build_warnings {
        let _ = writeln!(out, "- [{}] {}", warning.code(), warning);
    }
}

fn write_diagnostics(out: &mut String, title: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    section(out, title);
    for diagnostic in diagnostics {
        let _ = writeln!(out, "- [{}] {}", diagnostic.code, diagnostic.message);
    }
}
