//! Writes rendered artifacts to an output directory.
//!
//! Every artifact is attempted independently: one unwritable file is
//! recorded in the summary and the rest are still written.

use crate::diagram::{render_with, DiagramMode, NodeFilter, RollupPolicy};
use crate::report::{generate, ReportOptions};
use grove_core::AnalysisConfig;
use grove_graph::{AnalysisResults, DependencyGraph};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name of the exported Markdown report.
pub const REPORT_FILE: &str = "dependency-report.md";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("cannot create output directory {dir} for {path}: {source}")]
    CreateDir {
        dir: PathBuf,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path} after {attempts} attempt(s): {source}")]
    Write {
        path: PathBuf,
        attempts: usize,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    /// The artifact path this failure belongs to.
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDir { path, .. } | Self::Write { path, .. } => path,
        }
    }
}

/// One file to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }

    pub fn diagram(mode: &DiagramMode, text: String) -> Self {
        Self::new(mode.file_name(), text)
    }

    pub fn report(text: String) -> Self {
        Self::new(REPORT_FILE, text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Extra attempts after a failed write.
    pub retries: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { retries: 1 }
    }
}

impl From<&AnalysisConfig> for ExportOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            retries: config.export_retries,
        }
    }
}

/// What an export run did, file by file.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ExportError>,
}

impl ExportSummary {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders the three standard diagrams and the report.
pub fn render_all(
    graph: &DependencyGraph,
    results: &AnalysisResults,
    config: &AnalysisConfig,
) -> Vec<Artifact> {
    let modes = [
        DiagramMode::Full,
        DiagramMode::CategoryRollup(RollupPolicy::default()),
        DiagramMode::FilteredSubset(NodeFilter::from_spec(&config.filter)),
    ];

    let mut artifacts: Vec<Artifact> = modes
        .iter()
        .map(|mode| Artifact::diagram(mode, render_with(graph, mode, config.direction)))
        .collect();

    let report_options = ReportOptions {
        top_n: config.top_n,
        ..ReportOptions::default()
    };
    artifacts.push(Artifact::report(generate(graph, results, &report_options)));
    artifacts
}

/// Writes every artifact into `dir`, creating it if needed.
pub fn export_artifacts(dir: &Path, artifacts: &[Artifact], options: &ExportOptions) -> ExportSummary {
    let mut summary = ExportSummary::default();

    if let Err(err) = fs::create_dir_all(dir) {
        warn!("cannot create {}: {}", dir.display(), err);
        for artifact in artifacts {
            summary.failures.push(ExportError::CreateDir {
                dir: dir.to_path_buf(),
                path: dir.join(&artifact.file_name),
                source: io::Error::new(err.kind(), err.to_string()),
            });
        }
        return summary;
    }

    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        match write_with_retries(&path, &artifact.contents, options.retries) {
            Ok(()) => {
                debug!("wrote {}", path.display());
                summary.written.push(path);
            }
            Err(err) => {
                warn!("{}", err);
                summary.failures.push(err);
            }
        }
    }

    info!(
        "exported {} of {} artifacts to {}",
        summary.written.len(),
        artifacts.len(),
        dir.display()
    );
    summary
}

fn write_with_retries(path: &Path, contents: &str, retries: usize) -> Result<(), ExportError> {
    let attempts = retries + 1;
    let mut last_error = None;

    for attempt in 1..=attempts {
        match write_file(path, contents) {
            Ok(()) => return Ok(()),
            Err(err) => {
                debug!("write attempt {} for {} failed: {}", attempt, path.display(), err);
                last_error = Some(err);
            }
        }
    }

    Err(ExportError::Write {
        path: path.to_path_buf(),
        attempts,
        source: last_error.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "no attempt made")),
    })
}

fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()
}
