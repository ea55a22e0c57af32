//! Error types for dependency pipelines.
//!
//! Every fatal condition in a pipeline is a [`PipelineError`]. Errors are
//! propagated with `?` up to the binary, which prints the message and exits
//! with [`PipelineError::exit_code`]. Tolerated failures (optional commands,
//! best-effort removal) never become errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a dependency pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A mandatory external command exited non-zero or could not be spawned.
    #[error("Failure while executing: {command}")]
    CommandFailed { command: String, exit_code: i32 },

    /// A required artifact was not found under the build tree.
    #[error("failed to find and copy: {name}")]
    ArtifactMissing { name: String },

    /// The host OS has no generator mapping.
    #[error("Unsupported OS: {name}")]
    UnsupportedOs { name: String },

    /// HTTP download failed.
    #[error("Download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    /// Archive could not be unpacked.
    #[error("Failed to extract {}: {reason}", archive.display())]
    Extraction { archive: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Invalid configuration value (flag or environment variable).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    /// Wrap an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a `CommandFailed` error.
    pub fn command_failed(command: impl Into<String>, exit_code: i32) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
        }
    }

    /// Create an `ArtifactMissing` error.
    pub fn artifact_missing(name: impl Into<String>) -> Self {
        Self::ArtifactMissing { name: name.into() }
    }

    /// Process exit code for this error.
    ///
    /// A failed command surfaces its own exit code. The remaining codes follow
    /// sysexits.h where a category fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            // A failure always exits non-zero, even if the child reported 0.
            Self::CommandFailed { exit_code, .. } => {
                if *exit_code == 0 {
                    1
                } else {
                    *exit_code
                }
            }
            Self::ArtifactMissing { .. } | Self::UnsupportedOs { .. } => 1,
            Self::Download { .. } => 69,                 // EX_UNAVAILABLE
            Self::Extraction { .. } | Self::Io { .. } => 74, // EX_IOERR
            Self::Config(_) => 78,                       // EX_CONFIG
        }
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_keeps_exit_code() {
        let err = PipelineError::command_failed("make -j8", 2);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Failure while executing: make -j8");
    }

    #[test]
    fn test_command_failed_never_exits_zero() {
        let err = PipelineError::command_failed("true", 0);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_artifact_missing_message() {
        let err = PipelineError::artifact_missing("lib.a");
        assert_eq!(err.to_string(), "failed to find and copy: lib.a");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_io_error_context() {
        let err = PipelineError::io(
            "Failed to create CACHE",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to create CACHE: denied");
        assert_eq!(err.exit_code(), 74);
    }
}
