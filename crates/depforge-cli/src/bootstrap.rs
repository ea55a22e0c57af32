//! Composition root: wires the runtime adapters into a [`CliContext`].

use std::path::PathBuf;

use depforge_core::{BuildMode, PipelineConfig};
use depforge_runtime::{HostProbe, HttpDownloader, Pipeline, ShellRunner};

use crate::error::CliError;

/// Adapters and configuration shared by every handler.
pub struct CliContext {
    pub runner: ShellRunner,
    pub probe: HostProbe,
    pub downloader: HttpDownloader,
    pub config: PipelineConfig,
}

impl CliContext {
    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(&self.runner, &self.probe, &self.downloader, &self.config)
    }
}

/// Resolve configuration from flags and the process environment and build the
/// context.
pub fn bootstrap(
    root: Option<PathBuf>,
    jobs: Option<usize>,
    mode: BuildMode,
) -> Result<CliContext, CliError> {
    let cwd = std::env::current_dir().map_err(CliError::CurrentDir)?;
    let config = PipelineConfig::resolve(root, jobs, mode, cwd, |key| std::env::var(key).ok())?;
    tracing::debug!(root = %config.root.display(), jobs = ?config.jobs, %mode, "Resolved configuration");

    Ok(CliContext {
        runner: ShellRunner::new(),
        probe: HostProbe::new(),
        downloader: HttpDownloader::new(),
        config,
    })
}
