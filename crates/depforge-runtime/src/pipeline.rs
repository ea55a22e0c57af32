//! Dependency fetch-build-stage pipeline.
//!
//! A [`Pipeline`] walks a [`Recipe`] through a fixed, linear sequence of
//! [`Stage`]s. Every side effect goes through the ports it was built with, and
//! every destructive or network step is guarded by an existence check, so a
//! re-run after a failure picks up the existing checkout, cache and build tree.

use std::fmt;
use std::fs;

use depforge_core::{
    ArchiveDownloader, BuildRecord, CommandRunner, EnvironmentProbe, PipelineConfig,
    PipelineError, PipelineResult, Recipe, RecipeContext, ensure_dir,
};
use tracing::{debug, info, warn};

use crate::cmake;
use crate::fetch;
use crate::fs::{find_and_copy, remove_tree};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    WorkspacePrepared,
    SourceObtained,
    SourcePinned,
    Configured,
    Compiled,
    ArtifactsStaged,
    IntegrationFilesCopied,
    Done,
}

impl Stage {
    pub const ALL: [Self; 8] = [
        Self::WorkspacePrepared,
        Self::SourceObtained,
        Self::SourcePinned,
        Self::Configured,
        Self::Compiled,
        Self::ArtifactsStaged,
        Self::IntegrationFilesCopied,
        Self::Done,
    ];

    /// The stage after this one; `None` once done.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::WorkspacePrepared => Some(Self::SourceObtained),
            Self::SourceObtained => Some(Self::SourcePinned),
            Self::SourcePinned => Some(Self::Configured),
            Self::Configured => Some(Self::Compiled),
            Self::Compiled => Some(Self::ArtifactsStaged),
            Self::ArtifactsStaged => Some(Self::IntegrationFilesCopied),
            Self::IntegrationFilesCopied => Some(Self::Done),
            Self::Done => None,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::WorkspacePrepared => "preparing workspace",
            Self::SourceObtained => "obtaining sources",
            Self::SourcePinned => "pinning sources",
            Self::Configured => "configuring",
            Self::Compiled => "compiling",
            Self::ArtifactsStaged => "staging artifacts",
            Self::IntegrationFilesCopied => "copying integration files",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Runs recipes against a set of ports.
pub struct Pipeline<'a> {
    runner: &'a dyn CommandRunner,
    probe: &'a dyn EnvironmentProbe,
    downloader: &'a dyn ArchiveDownloader,
    config: &'a PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        probe: &'a dyn EnvironmentProbe,
        downloader: &'a dyn ArchiveDownloader,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            runner,
            probe,
            downloader,
            config,
        }
    }

    /// Recipe inputs for this host and configuration.
    pub fn context(&self) -> RecipeContext {
        RecipeContext::new(self.probe.os_family(), self.config.mode, self.config.layout())
    }

    /// Run every stage of `recipe` in order and return the written build record.
    pub async fn run(&self, recipe: &Recipe) -> PipelineResult<BuildRecord> {
        println!();
        println!("Building {} ({})...", recipe.display_name, recipe.version);

        let mut stage = Stage::WorkspacePrepared;
        while stage != Stage::Done {
            info!(dependency = %recipe.name, stage = ?stage, "Entering stage");
            match stage {
                Stage::WorkspacePrepared => self.prepare_workspace(recipe)?,
                Stage::SourceObtained => self.obtain_sources(recipe).await?,
                Stage::SourcePinned => self.pin_sources(recipe)?,
                Stage::Configured => cmake::configure(self.runner, &recipe.configure)?,
                Stage::Compiled => self.compile(recipe)?,
                Stage::ArtifactsStaged => self.stage_artifacts(recipe)?,
                Stage::IntegrationFilesCopied => self.copy_integration_files(recipe)?,
                Stage::Done => {}
            }
            stage = stage.next().unwrap_or(Stage::Done);
        }

        self.finish(recipe)
    }

    fn prepare_workspace(&self, recipe: &Recipe) -> PipelineResult<()> {
        let layout = self.config.layout();
        ensure_dir(&layout.cache_dir())?;
        ensure_dir(&layout.deps_dir())?;

        for staging in &recipe.staging {
            ensure_dir(&staging.dir)?;
        }

        if ensure_dir(&recipe.build_dir)? {
            info!(dir = %recipe.build_dir.display(), "Created build directory");
        }
        Ok(())
    }

    async fn obtain_sources(&self, recipe: &Recipe) -> PipelineResult<()> {
        if let Some(git) = &recipe.git {
            fetch::clone_if_missing(self.runner, git)?;
        }

        let layout = self.config.layout();
        for archive in &recipe.archives {
            let cached = layout.cached_archive(&archive.file_name);
            if cached.exists() {
                debug!(archive = %archive.file_name, "Using cached archive");
            } else {
                println!("Downloading {}...", archive.file_name);
                self.downloader.download(&archive.url, &cached).await?;
            }

            if archive.installed_path().exists() {
                debug!(path = %archive.installed_path().display(), "Already extracted");
            } else {
                fetch::extract(self.runner, archive, &cached)?;
            }
        }
        Ok(())
    }

    fn pin_sources(&self, recipe: &Recipe) -> PipelineResult<()> {
        match &recipe.git {
            Some(git) => fetch::pin(self.runner, git),
            None => Ok(()),
        }
    }

    fn compile(&self, recipe: &Recipe) -> PipelineResult<()> {
        let jobs = self.config.parallelism(self.probe.logical_cpu_count());
        cmake::compile(self.runner, &recipe.compile, self.config.mode, jobs)
    }

    fn stage_artifacts(&self, recipe: &Recipe) -> PipelineResult<()> {
        // Runs after pinning; a failed fetch leaves the previous stage intact
        for staging in recipe.staging.iter().filter(|s| s.reset) {
            debug!(dir = %staging.dir.display(), "Resetting staging directory");
            remove_tree(self.runner, &self.probe.os_family(), &staging.dir);
            ensure_dir(&staging.dir)?;
        }

        for artifact in &recipe.artifacts {
            let found = find_and_copy(&artifact.name, &artifact.search_root, &artifact.destination)?;
            if found {
                println!("✓ Staged {}", artifact.name);
            } else if artifact.required {
                return Err(PipelineError::artifact_missing(&artifact.name));
            } else {
                warn!(
                    artifact = %artifact.name,
                    root = %artifact.search_root.display(),
                    "Optional artifact not found"
                );
            }
        }
        Ok(())
    }

    fn copy_integration_files(&self, recipe: &Recipe) -> PipelineResult<()> {
        for file in &recipe.integration_files {
            if let Some(parent) = file.destination.parent() {
                ensure_dir(parent)?;
            }
            fs::copy(&file.source, &file.destination).map_err(|e| {
                PipelineError::io(
                    format!(
                        "Failed to copy {} to {}",
                        file.source.display(),
                        file.destination.display()
                    ),
                    e,
                )
            })?;
            debug!(dest = %file.destination.display(), "Copied integration file");
        }
        Ok(())
    }

    fn finish(&self, recipe: &Recipe) -> PipelineResult<BuildRecord> {
        let os = self.probe.os_family();
        let record = BuildRecord::from_recipe(recipe, os.name(), self.config.mode.as_str());
        let path = record.save(&self.config.layout().records_dir())?;
        debug!(path = %path.display(), "Wrote build record");

        info!(dependency = %recipe.name, version = %recipe.version, "Pipeline finished");
        println!("✓ {} built successfully!", recipe.display_name);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_is_linear() {
        let mut walked = vec![Stage::WorkspacePrepared];
        while let Some(next) = walked.last().and_then(|s| s.next()) {
            walked.push(next);
        }
        assert_eq!(walked, Stage::ALL);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::ArtifactsStaged.to_string(), "staging artifacts");
    }
}
