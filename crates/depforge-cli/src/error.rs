//! CLI error types and exit-code mapping.

use depforge_core::PipelineError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A pipeline or recipe failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The working directory could not be determined.
    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

impl CliError {
    /// Map error to the process exit code.
    ///
    /// Pipeline errors carry their own code (a failed command's exit code,
    /// or a sysexits.h category).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Pipeline(err) => err.exit_code(),
            Self::CurrentDir(_) => 71, // EX_OSERR
        }
    }
}

/// Exit code for an error reaching `main`.
pub fn exit_code_of(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        cli.exit_code()
    } else if let Some(pipeline) = err.downcast_ref::<PipelineError>() {
        pipeline.exit_code()
    } else {
        1
    }
}

/// The failure line printed before exiting.
pub fn failure_line(err: &anyhow::Error, code: i32) -> String {
    format!("[-] {err} (code = {code})")
}
