//! `depforge` command-line interface.
//!
//! The binary in `main.rs` parses arguments, sets up logging and hands off to
//! the handlers here. Every failure reaches `main` as an error carrying its
//! exit code; nothing below exits the process.

#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;

/// Dispatch a parsed command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = bootstrap(cli.root, cli.jobs, cli.command.mode())?;

    match &cli.command {
        Commands::Probe => handlers::probe::execute(&ctx).map_err(CliError::from)?,
        command => {
            let targets = handlers::build::targets(command);
            handlers::build::execute(&ctx, &targets)
                .await
                .map_err(CliError::from)?;
        }
    }
    Ok(())
}
