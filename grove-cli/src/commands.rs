//! CLI command implementations.

use crate::RenderMode;
use colored::Colorize;
use grove_core::{AnalysisConfig, Catalog, Importance};
use grove_graph::{
    build_catalog, find_cycles, find_longest_chains, validate as validate_graph, AnalysisOptions,
    AnalysisResults, BuildOutcome, BuildWarning, ConnectivityReport, DependencyGraph,
    ValidationOptions,
};
use grove_render::{
    export_artifacts, generate, render_all, render_with, DiagramMode, ExportOptions, NodeFilter,
    ReportOptions, RollupPolicy,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Strict validation found errors. The binary exits with code 2.
#[derive(Error, Debug)]
#[error("validation failed with {0} error(s)")]
pub struct StrictFailure(pub usize);

/// The graph failed its integrity check outside strict mode.
#[derive(Error, Debug)]
#[error("graph integrity check failed with {0} error(s)")]
pub struct IntegrityFailure(pub usize);

/// Write the default config.
pub fn init(path: &Path) -> Result<()> {
    let config_path = AnalysisConfig::path_in(path);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    let written = AnalysisConfig::default().save(path)?;

    println!("{} Initialized Grove in {}", "✓".green(), path.display());
    println!("  Config: {}", written.display().to_string().dimmed());
    println!("  Run {} to analyze a catalog", "grove analyze <catalog>".cyan());

    Ok(())
}

/// Full pipeline: build, analyze, print a summary, export artifacts.
pub async fn analyze(
    catalog: &Path,
    strict: bool,
    parallel: bool,
    output: Option<PathBuf>,
    no_export: bool,
) -> Result<()> {
    let mut config = load_config()?;
    config.strict |= strict;
    if let Some(dir) = output {
        config.output_dir = dir;
    }

    let started = Instant::now();
    let BuildOutcome { graph, warnings } = load_graph(catalog)?;
    let graph = Arc::new(graph);
    let options = AnalysisOptions::from(&config);

    let results = if parallel {
        run_parallel(Arc::clone(&graph), warnings, options).await?
    } else {
        AnalysisResults::run(&graph, warnings, &options)
    };

    println!(
        "{} Analyzed {} nodes ({} edges) in {}ms",
        "✓".green(),
        graph.node_count().to_string().cyan(),
        graph.edge_count().to_string().cyan(),
        started.elapsed().as_millis()
    );
    print_build_warnings(&results.build_warnings);
    println!(
        "  {} {}  {} {}  {} {}",
        "Cycles:".dimmed(),
        results.cycles.len(),
        "Chains:".dimmed(),
        results.chains.len(),
        "Isolated:".dimmed(),
        results.connectivity.isolated.len()
    );
    if let Some(longest) = results.chains.first() {
        println!("  {} {}", "Longest chain:".dimmed(), longest);
    }

    if !no_export {
        let artifacts = render_all(&graph, &results, &config);
        let summary = export_artifacts(&config.output_dir, &artifacts, &ExportOptions::from(&config));
        for path in &summary.written {
            println!("{} Wrote {}", "✓".green(), path.display());
        }
        for failure in &summary.failures {
            println!("{} {}", "⚠".yellow(), failure.to_string().red());
        }
    }

    print_diagnostics(&results.connectivity);
    check_health(&results.connectivity, config.strict)
}

/// Runs the three analyzers on blocking tasks and joins them.
async fn run_parallel(
    graph: Arc<DependencyGraph>,
    warnings: Vec<BuildWarning>,
    options: AnalysisOptions,
) -> Result<AnalysisResults> {
    let cycles_graph = Arc::clone(&graph);
    let chains_graph = Arc::clone(&graph);
    let validation = options.validation();

    let cycles = tokio::task::spawn_blocking(move || find_cycles(&cycles_graph));
    let chains =
        tokio::task::spawn_blocking(move || find_longest_chains(&chains_graph, options.chain_limit));
    let connectivity = tokio::task::spawn_blocking(move || validate_graph(&graph, &validation));

    let (cycles, chains, connectivity) = tokio::try_join!(cycles, chains, connectivity)?;
    Ok(AnalysisResults::new(warnings, cycles, chains, connectivity))
}

/// List dependency cycles.
pub fn cycles(catalog: &Path) -> Result<()> {
    let outcome = load_graph(catalog)?;
    print_build_warnings(&outcome.warnings);

    let cycles = find_cycles(&outcome.graph);
    if cycles.is_empty() {
        println!("{} No cycles detected", "✓".green());
        return Ok(());
    }

    println!("{} {} cycle(s):\n", "⚠".yellow(), cycles.len());
    for cycle in &cycles {
        println!("  {}", cycle.to_string().yellow());
    }

    Ok(())
}

/// List the longest dependency chains.
pub fn chains(catalog: &Path, limit: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let outcome = load_graph(catalog)?;
    print_build_warnings(&outcome.warnings);

    let chains = find_longest_chains(&outcome.graph, limit.unwrap_or(config.chain_limit));
    if chains.is_empty() {
        println!("No chains (empty graph)");
        return Ok(());
    }

    println!("{}", "Longest Chains".cyan().bold());
    println!();
    for (rank, chain) in chains.iter().enumerate() {
        println!(
            "  {}. {} {}",
            rank + 1,
            chain,
            format!("({})", chain.len()).dimmed()
        );
    }

    Ok(())
}

#[derive(Serialize)]
struct ValidationOutput<'a> {
    healthy: bool,
    #[serde(flatten)]
    report: &'a ConnectivityReport,
    build_warnings: &'a [BuildWarning],
}

/// Validate connectivity.
pub fn validate(catalog: &Path, strict: bool, json_output: bool) -> Result<()> {
    let config = load_config()?;
    let strict = strict || config.strict;
    let outcome = load_graph(catalog)?;

    let report = validate_graph(&outcome.graph, &ValidationOptions { strict });

    if json_output {
        let output = ValidationOutput {
            healthy: report.is_healthy(),
            report: &report,
            build_warnings: &outcome.warnings,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_build_warnings(&outcome.warnings);
        print_diagnostics(&report);

        println!("{}", "Most Connected".cyan().bold());
        for (id, degree) in report.top(config.top_n) {
            println!("  {} {}", id, format!("(degree {})", degree).dimmed());
        }

        if report.is_healthy() {
            println!("{} Validation passed", "✓".green());
        }
    }

    check_health(&report, strict)
}

/// Print a diagram to stdout.
pub fn render(catalog: &Path, mode: RenderMode, min_importance: Option<Importance>) -> Result<()> {
    let config = load_config()?;
    let outcome = load_graph(catalog)?;

    let mode = match mode {
        RenderMode::Full => DiagramMode::Full,
        RenderMode::Rollup => DiagramMode::CategoryRollup(RollupPolicy::default()),
        RenderMode::Filtered => DiagramMode::FilteredSubset(match min_importance {
            Some(tier) => NodeFilter::min_importance(tier),
            None => NodeFilter::from_spec(&config.filter),
        }),
    };

    print!("{}", render_with(&outcome.graph, &mode, config.direction));
    Ok(())
}

/// Print the Markdown report to stdout.
pub fn report(catalog: &Path) -> Result<()> {
    let config = load_config()?;
    let BuildOutcome { graph, warnings } = load_graph(catalog)?;

    let results = AnalysisResults::run(&graph, warnings, &AnalysisOptions::from(&config));
    let options = ReportOptions {
        top_n: config.top_n,
        ..ReportOptions::default()
    };

    print!("{}", generate(&graph, &results, &options));
    Ok(())
}

fn load_config() -> Result<AnalysisConfig> {
    Ok(AnalysisConfig::load_or_default(Path::new("."))?)
}

fn load_graph(path: &Path) -> Result<BuildOutcome> {
    let catalog = Catalog::load(path)?;
    tracing::debug!("loaded {} entries from {}", catalog.len(), path.display());
    Ok(build_catalog(&catalog)?)
}

fn print_build_warnings(warnings: &[BuildWarning]) {
    if warnings.is_empty() {
        return;
    }

    // stderr: stdout may be carrying diagram or report text.
    eprintln!("{} {} build warning(s):", "⚠".yellow(), warnings.len());
    for warning in warnings.iter().take(10) {
        eprintln!("  {} {}", format!("[{}]", warning.code()).dimmed(), warning);
    }
    if warnings.len() > 10 {
        eprintln!("  ... and {} more", warnings.len() - 10);
    }
}

fn print_diagnostics(report: &ConnectivityReport) {
    if !report.warnings.is_empty() {
        println!("\n{} {} warning(s):", "⚠".yellow(), report.warnings.len());
        for warning in report.warnings.iter().take(10) {
            println!("  {} {}", format!("[{}]", warning.code).dimmed(), warning.message);
        }
        if report.warnings.len() > 10 {
            println!("  ... and {} more", report.warnings.len() - 10);
        }
    }

    if !report.errors.is_empty() {
        println!("\n{} {} error(s):", "✗".red(), report.errors.len());
        for error in &report.errors {
            println!("  {} {}", format!("[{}]", error.code).red(), error.message);
        }
    }
    println!();
}

/// Any validation error fails the command. Strict mode reports it as a
/// [`StrictFailure`] so the binary can exit with code 2.
fn check_health(report: &ConnectivityReport, strict: bool) -> Result<()> {
    if report.is_healthy() {
        return Ok(());
    }
    let count = report.errors.len();
    if strict {
        Err(Box::new(StrictFailure(count)))
    } else {
        Err(Box::new(IntegrityFailure(count)))
    }
}
