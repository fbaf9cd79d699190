use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use plugindex::config::DEFAULT_CATALOG_PATH;

mod sort;
mod validate;

/// Exit status for a catalog that could not be read or parsed.
const EXIT_FATAL: i32 = 2;

#[derive(Parser)]
#[command(
    name = "plugindex",
    version,
    about = "Plugin repository index validator"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output format for validation results.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Format {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON report object
    Json,
}

#[derive(Subcommand)]
#[command(next_display_order = None)]
enum Commands {
    /// Validate a plugin index (order, versions, transport, platforms, checksums)
    Validate {
        /// Path to the index file
        #[arg(default_value = DEFAULT_CATALOG_PATH)]
        path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Download every binary and verify its checksum (also: BINARY_VALIDATION=true)
        #[arg(long)]
        binary_validation: bool,
        /// Concurrent checksum downloads [default: PLUGINDEX_JOBS or 1]
        #[arg(long)]
        jobs: Option<usize>,
        /// Per-download timeout in seconds [default: PLUGINDEX_TIMEOUT_SECS or 300]
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Print the index in canonical sorted form (never modifies the file)
    Sort {
        /// Path to the index file
        #[arg(default_value = DEFAULT_CATALOG_PATH)]
        path: PathBuf,
        /// Show a diff and exit 1 if the file is not sorted
        #[arg(long)]
        check: bool,
    },
}

pub fn run(cli: Cli) {
    init_tracing();

    match cli.command {
        Commands::Validate {
            path,
            format,
            binary_validation,
            jobs,
            timeout,
        } => validate::run(path, format, binary_validation, jobs, timeout),
        Commands::Sort { path, check } => sort::run(path, check),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
