//! Connectivity classification and graph validation.
//!
//! Sorts findings into errors and warnings:
//! - isolated nodes are warnings (leaf utilities may be isolated on purpose)
//! - cycles are warnings, or errors in strict mode
//! - structural invariant violations are always errors

use crate::cycles::find_cycles;
use crate::graph::DependencyGraph;
use serde::Serialize;
use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    IsolatedNode,
    Cycle,
    InvariantViolation,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IsolatedNode => "isolated-node",
            Self::Cycle => "cycle",
            Self::InvariantViolation => "invariant-violation",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// Node ids involved, if any.
    pub nodes: Vec<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)
    }
}

/// Validation policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Escalate cycles to errors.
    pub strict: bool,
}

impl ValidationOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Result of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectivityReport {
    /// Nodes with no dependencies and no dependents, in catalog order.
    pub isolated: Vec<String>,
    /// `(id, degree)` for every node, by degree descending, then id.
    /// Isolated nodes rank last with degree 0.
    pub most_connected: Vec<(String, usize)>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ConnectivityReport {
    /// True when validation found no errors.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }

    /// The `n` most connected nodes.
    pub fn top(&self, n: usize) -> &[(String, usize)] {
        &self.most_connected[..n.min(self.most_connected.len())]
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }
}

/// Validates the graph and classifies its connectivity.
pub fn validate(graph: &DependencyGraph, options: &ValidationOptions) -> ConnectivityReport {
    let mut report = ConnectivityReport::default();

    for violation in graph.integrity_violations() {
        report.push(Diagnostic {
            severity: Severity::Error,
            code: DiagnosticCode::InvariantViolation,
            message: violation,
            nodes: Vec::new(),
        });
    }

    for index in graph.node_indexes() {
        let Some(node) = graph.get(index) else {
            continue;
        };
        let degree = graph.degree(index);
        if degree == 0 {
            report.isolated.push(node.id.clone());
            report.push(Diagnostic {
                severity: Severity::Warning,
                code: DiagnosticCode::IsolatedNode,
                message: format!("'{}' has no dependencies and no dependents", node.id),
                nodes: vec![node.id.clone()],
            });
        }
        report.most_connected.push((node.id.clone(), degree));
    }
    report
        .most_connected
        .sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let cycle_severity = if options.strict {
        Severity::Error
    } else {
        Severity::Warning
    };
    for cycle in find_cycles(graph) {
        report.push(Diagnostic {
            severity: cycle_severity,
            code: DiagnosticCode::Cycle,
            message: format!("dependency cycle: {}", cycle),
            nodes: cycle.nodes().to_vec(),
        });
    }

    tracing::info!(
        "validation: {} errors, {} warnings, {} isolated",
        report.errors.len(),
        report.warnings.len(),
        report.isolated.len()
    );
    report
}
