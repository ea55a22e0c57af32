//! Process runner port.

use crate::command::CommandInvocation;
use crate::error::PipelineResult;

/// Runs external shell commands.
///
/// Implementations block until the child exits. A mandatory invocation that
/// fails (non-zero exit or spawn error) returns
/// [`PipelineError::CommandFailed`](crate::PipelineError::CommandFailed) with
/// the child's exit code; an optional invocation always returns `Ok(())`.
pub trait CommandRunner: Send + Sync {
    fn execute(&self, invocation: &CommandInvocation) -> PipelineResult<()>;
}
