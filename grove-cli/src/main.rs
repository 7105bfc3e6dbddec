//! Grove CLI - Command-line interface for Grove
//!
//! Loads a catalog, builds the dependency graph, and prints or exports
//! the analysis: cycles, chains, connectivity, diagrams and the report.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use grove_core::Importance;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "grove")]
#[command(author = "Grove Contributors")]
#[command(version)]
#[command(about = "Dependency graph analysis for monorepo catalogs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config to .grove/config.json
    Init {
        /// Project root (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Build the graph, run every analyzer, and export diagrams and report
    Analyze {
        /// Catalog JSON file
        catalog: PathBuf,

        /// Treat cycles as errors
        #[arg(long)]
        strict: bool,

        /// Run the analyzers concurrently
        #[arg(long)]
        parallel: bool,

        /// Output directory (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the summary only, write no files
        #[arg(long)]
        no_export: bool,
    },

    /// List dependency cycles
    Cycles {
        /// Catalog JSON file
        catalog: PathBuf,
    },

    /// List the longest dependency chains
    Chains {
        /// Catalog JSON file
        catalog: PathBuf,

        /// Maximum chains to show (0 = all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Validate connectivity and report errors and warnings
    Validate {
        /// Catalog JSON file
        catalog: PathBuf,

        /// Treat cycles as errors
        #[arg(long)]
        strict: bool,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Print a Mermaid diagram to stdout
    Render {
        /// Catalog JSON file
        catalog: PathBuf,

        /// Diagram mode
        #[arg(short, long, value_enum, default_value_t = RenderMode::Full)]
        mode: RenderMode,

        /// Lowest importance shown in filtered mode
        #[arg(long)]
        min_importance: Option<Importance>,
    },

    /// Print the Markdown report to stdout
    Report {
        /// Catalog JSON file
        catalog: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RenderMode {
    Full,
    Rollup,
    Filtered,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Analyze {
            catalog,
            strict,
            parallel,
            output,
            no_export,
        } => commands::analyze(&catalog, strict, parallel, output, no_export).await,
        Commands::Cycles { catalog } => commands::cycles(&catalog),
        Commands::Chains { catalog, limit } => commands::chains(&catalog, limit),
        Commands::Validate {
            catalog,
            strict,
            json,
        } => commands::validate(&catalog, strict, json),
        Commands::Render {
            catalog,
            mode,
            min_importance,
        } => commands::render(&catalog, mode, min_importance),
        Commands::Report { catalog } => commands::report(&catalog),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        let code = if e.is::<commands::StrictFailure>() { 2 } else { 1 };
        std::process::exit(code);
    }
}
