//! Shell process runner.
//!
//! Implements [`CommandRunner`] by handing the command line to the platform
//! shell and blocking until the child exits. Output is inherited so build tool
//! progress streams straight to the terminal.

use std::process::{Command, ExitStatus, Stdio};

use depforge_core::{CommandInvocation, CommandRunner, PipelineError, PipelineResult};
use tracing::{debug, info};

/// Exit code reported when the child could not be spawned at all.
const SPAWN_FAILURE_CODE: i32 = 1;

/// Runs commands through `sh -c` (Unix) or `cmd /C` (Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub const fn new() -> Self {
        Self
    }
}

fn shell_command(command_line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    }

    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}

/// Map an exit status to a single code; signals become `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    SPAWN_FAILURE_CODE
}

impl CommandRunner for ShellRunner {
    fn execute(&self, invocation: &CommandInvocation) -> PipelineResult<()> {
        info!(command = %invocation.command_line, "Executing");

        let mut cmd = shell_command(&invocation.command_line);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(env) = &invocation.environment {
            cmd.envs(env);
        }
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        let code = match cmd.status() {
            Ok(status) => exit_code(status),
            Err(e) => {
                debug!(command = %invocation.command_line, error = %e, "Failed to spawn");
                SPAWN_FAILURE_CODE
            }
        };

        if code == 0 {
            return Ok(());
        }

        if invocation.must_succeed {
            return Err(PipelineError::command_failed(
                invocation.command_line.clone(),
                code,
            ));
        }

        debug!(
            command = %invocation.command_line,
            exit_code = code,
            "Ignoring failure of optional command"
        );
        Ok(())
    }
}
