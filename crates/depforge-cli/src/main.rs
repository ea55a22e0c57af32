//! CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use depforge_cli::Cli;
use depforge_cli::error::{exit_code_of, failure_line};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("depforge=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depforge=info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Invalid arguments exit with code 2
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = depforge_cli::run(cli).await {
        let code = exit_code_of(&err);
        tracing::debug!(error = ?err, code, "Exiting with failure");
        eprintln!("{}", failure_line(&err, code));
        std::process::exit(code);
    }
}
