//! CLI entry point for dirsnap

use std::path::PathBuf;
use std::process;

use clap::Parser;
use dirsnap::{TreeWalker, WalkerConfig, print_json};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dirsnap")]
#[command(about = "Snapshot one or more directory trees as nested JSON")]
#[command(version)]
struct Args {
    /// Paths to snapshot; each becomes a top-level key named after its last component
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Number of parallel workers scanning directories
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Spawn one thread per directory instead of using a bounded pool
    /// (may exhaust OS threads on very large trees)
    #[arg(long = "unbounded", conflicts_with = "jobs")]
    unbounded: bool,

    /// Treat every entry directly inside each PATH as its own root
    #[arg(short = 'e', long = "expand")]
    expand: bool,

    /// Log each scanned directory to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    let walker_config = WalkerConfig {
        parallel_workers: args.jobs,
        unbounded: args.unbounded,
        expand_roots: args.expand,
    };

    let result = TreeWalker::new(walker_config).walk(&args.paths);

    for error in &result.errors {
        warn!("{}", error);
    }
    if !result.errors.is_empty() {
        info!(skipped = result.errors.len(), "snapshot completed with skipped paths");
    }

    if let Err(e) = print_json(&result.roots) {
        eprintln!("dirsnap: error writing output: {}", e);
        process::exit(1);
    }
}

/// Log to stderr so stdout carries only the JSON document.
fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("dirsnap=debug,warn")
        } else {
            EnvFilter::new("dirsnap=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
