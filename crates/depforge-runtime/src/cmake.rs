//! CMake configure and native build driver.

use depforge_core::{
    BuildMode, CommandInvocation, CommandRunner, CompileSpec, ConfigureSpec, PipelineResult,
    ensure_dir,
};
use tracing::info;

/// Run `cmake -G ...` from the spec's working directory, creating it first.
pub fn configure(runner: &dyn CommandRunner, spec: &ConfigureSpec) -> PipelineResult<()> {
    ensure_dir(&spec.working_dir)?;
    println!("Configuring with CMake ({})...", spec.generator);
    runner.execute(&CommandInvocation::new(spec.command_line()).in_dir(&spec.working_dir))
}

/// Commands that compile (and optionally install) the configured project.
pub fn compile_commands(spec: &CompileSpec, mode: BuildMode, jobs: usize) -> Vec<CommandInvocation> {
    let mut commands = vec![
        CommandInvocation::new(spec.tool.compile_command(mode, jobs))
            .must_succeed(spec.must_succeed)
            .in_dir(&spec.working_dir),
    ];
    if spec.install {
        commands.push(
            CommandInvocation::new(spec.tool.install_command(mode))
                .must_succeed(spec.must_succeed)
                .in_dir(&spec.working_dir),
        );
    }
    commands
}

/// Compile with `jobs` parallel workers.
pub fn compile(
    runner: &dyn CommandRunner,
    spec: &CompileSpec,
    mode: BuildMode,
    jobs: usize,
) -> PipelineResult<()> {
    info!(tool = spec.tool.program(), jobs, "Compiling");
    println!("Compiling with {} ({jobs} jobs)...", spec.tool.program());
    for invocation in compile_commands(spec, mode, jobs) {
        runner.execute(&invocation)?;
    }
    Ok(())
}
