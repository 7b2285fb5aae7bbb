//! refdepth: rank TypeScript projects by build critical-path depth.
//!
//! Reads a list of tsconfig paths, assembles the project-reference graph,
//! and reports the projects sitting at the end of the deepest prerequisite
//! chains — the chains that lower-bound achievable build parallelism.

#![forbid(unsafe_code)]

mod assemble;
mod config;
mod output;
mod report;

use std::env;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use output::{CliError, OutputMode, render_error, resolve_output_mode};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "refdepth: build critical-path depth for TypeScript project references",
    long_about = None,
    after_help = "EXAMPLES:\n    # Rank the 10 deepest projects in a workspace\n    git ls-files '**/tsconfig.json' > tsconfigs.txt\n    refdepth --tsconfigs tsconfigs.txt --base-dir .\n\n    # Machine-readable output\n    refdepth --tsconfigs tsconfigs.txt --base-dir . --format json\n\n    # Inspect the raw reference graph\n    refdepth --tsconfigs tsconfigs.txt --base-dir . --graphviz | dot -Tsvg"
)]
struct Cli {
    /// Newline-delimited list of tsconfig paths, relative to --base-dir.
    #[arg(long, value_name = "FILE")]
    tsconfigs: PathBuf,

    /// Directory the tsconfig list entries resolve against.
    #[arg(long, value_name = "DIR")]
    base_dir: PathBuf,

    /// Number of deepest projects to report.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for --format json).
    #[arg(long, hide = true)]
    json: bool,

    /// Dump the assembled reference graph as Graphviz DOT and exit.
    #[arg(long)]
    graphviz: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("REFDEPTH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "refdepth=debug,info"
        } else {
            "refdepth=info,warn"
        })
    });

    let format = env::var("REFDEPTH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mode = resolve_output_mode(cli.format, cli.json);

    let graph = assemble::assemble_graph(&cli.tsconfigs, &cli.base_dir)?;
    debug!(
        projects = graph.node_count(),
        references = graph.edge_count(),
        "graph assembled"
    );

    if cli.graphviz {
        print!("{}", graph.to_graphviz());
        return Ok(());
    }

    match report::build_report(&graph, cli.top) {
        Ok(report) => report::render_report(&report, mode),
        // A cycle in the reference graph is user input, not a bug: surface
        // an actionable error instead of a partial or misleading ranking.
        Err(err) if !err.is_defect() => {
            render_error(
                mode,
                &CliError::with_details(
                    "cyclic dependency graph",
                    "break the tsconfig reference cycle before measuring chain depth",
                    "cyclic_graph",
                ),
            )?;
            anyhow::bail!("cyclic dependency graph: {err}");
        }
        Err(err) => Err(err.into()),
    }
}
