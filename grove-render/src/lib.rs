//! Grove Render - diagrams, reports and artifact export
//!
//! Everything here is a pure function of a built graph and the analyzer
//! results. Output is deterministic: the same catalog always renders to
//! byte-identical text.
//!
//! - [`render`] / [`render_with`]: Mermaid flowcharts in three [`DiagramMode`]s
//! - [`generate`]: the Markdown report
//! - [`export_artifacts`]: writes rendered text to an output directory

mod diagram;
mod export;
mod report;
mod sanitize;

pub use diagram::{
    render, render_with, style_class, DiagramMode, NodeFilter, PolicyEdge, RollupPolicy,
};
pub use export::{
    export_artifacts, render_all, Artifact, ExportError, ExportOptions, ExportSummary, REPORT_FILE,
};
pub use report::{generate, ReportOptions};
pub use sanitize::{sanitize, IdAllocator};
