//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Fetch, build and stage native dependencies.
#[derive(Parser)]
#[command(name = "depforge")]
#[command(about = "Fetch, build and stage native dependencies")]
#[command(version)]
pub struct Cli {
    /// Workspace root (defaults to DEPFORGE_ROOT, then the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Parallel build jobs (defaults to DEPFORGE_JOBS, then the CPU count)
    #[arg(short, long, global = true)]
    pub jobs: Option<usize>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
