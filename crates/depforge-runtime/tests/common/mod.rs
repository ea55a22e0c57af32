//! Port fakes shared by the pipeline integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use depforge_core::recipes::define;
use depforge_core::{
    ArchiveDownloader, ArtifactSpec, BuildMode, BuildTool, CommandInvocation, CommandRunner,
    CompileSpec, ConfigureSpec, EnvironmentProbe, Generator, GitSource, IntegrationFile,
    PipelineConfig, PipelineError, PipelineResult, Recipe, StagingSpec, WorkspaceLayout,
};

type Hook = Box<dyn Fn(&CommandInvocation) + Send + Sync>;

/// Records every invocation instead of spawning it.
///
/// Hooks emulate the side effects of real commands (a clone creating the
/// checkout, a compile producing a library); failures emulate exit codes.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandInvocation>>,
    hooks: Vec<(String, Hook)>,
    failures: Vec<(String, i32)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` for every command line starting with `prefix`.
    pub fn on(mut self, prefix: &str, hook: impl Fn(&CommandInvocation) + Send + Sync + 'static) -> Self {
        self.hooks.push((prefix.to_string(), Box::new(hook)));
        self
    }

    /// Make commands starting with `prefix` exit with `code`.
    pub fn fail(mut self, prefix: &str, code: i32) -> Self {
        self.failures.push((prefix.to_string(), code));
        self
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.command_line.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<CommandInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.command_lines().iter().any(|l| l.starts_with(prefix))
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl CommandRunner for RecordingRunner {
    fn execute(&self, invocation: &CommandInvocation) -> PipelineResult<()> {
        self.calls.lock().unwrap().push(invocation.clone());

        for (prefix, hook) in &self.hooks {
            if invocation.command_line.starts_with(prefix.as_str()) {
                hook(invocation);
            }
        }

        let failure = self
            .failures
            .iter()
            .find(|(prefix, _)| invocation.command_line.starts_with(prefix.as_str()));
        match failure {
            Some((_, code)) if invocation.must_succeed => Err(PipelineError::command_failed(
                invocation.command_line.clone(),
                *code,
            )),
            _ => Ok(()),
        }
    }
}

/// Probe with a fixed OS name and CPU count.
pub struct FixedProbe {
    pub os: String,
    pub cpus: usize,
}

impl FixedProbe {
    pub fn linux() -> Self {
        Self {
            os: "Linux".to_string(),
            cpus: 8,
        }
    }
}

impl EnvironmentProbe for FixedProbe {
    fn os_name(&self) -> String {
        self.os.clone()
    }

    fn logical_cpu_count(&self) -> usize {
        self.cpus
    }
}

/// Records requested URLs and writes an empty file in place of the archive.
#[derive(Default)]
pub struct NoopDownloader {
    urls: Mutex<Vec<String>>,
}

impl NoopDownloader {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveDownloader for NoopDownloader {
    async fn download(&self, url: &str, dest: &Path) -> PipelineResult<()> {
        self.urls.lock().unwrap().push(url.to_string());
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(dest, b"").unwrap();
        Ok(())
    }
}

pub fn config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        root: root.to_path_buf(),
        jobs: None,
        mode: BuildMode::Release,
    }
}

/// Create `path` (and parents) with `contents`.
pub fn touch(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Directory the sample recipe's build tool runs in.
pub fn sample_cmake_dir(layout: &WorkspaceLayout) -> PathBuf {
    layout.build_dir("x").join("x").join("build")
}

/// A minimal git + make recipe staging a single `lib.a`.
pub fn sample_recipe(layout: &WorkspaceLayout) -> Recipe {
    let build_dir = layout.build_dir("x");
    let checkout = build_dir.join("x");
    let cmake_dir = sample_cmake_dir(layout);
    let staging = layout.deps_dir().join("x");

    Recipe {
        name: "x".to_string(),
        display_name: "X".to_string(),
        version: "master".to_string(),
        build_dir,
        git: Some(GitSource {
            url: "https://example.invalid/x".to_string(),
            checkout_dir: checkout,
            branch: "master".to_string(),
            commit: None,
            patches: Vec::new(),
        }),
        archives: Vec::new(),
        staging: vec![StagingSpec::create(&staging)],
        configure: ConfigureSpec {
            working_dir: cmake_dir.clone(),
            generator: Generator::UnixMakefiles,
            flags: vec![define("CMAKE_BUILD_TYPE", BuildMode::Release)],
            source: "..".to_string(),
        },
        compile: CompileSpec {
            tool: BuildTool::Make,
            working_dir: cmake_dir.clone(),
            must_succeed: true,
            install: false,
        },
        artifacts: vec![ArtifactSpec::required(
            "lib.a",
            cmake_dir,
            staging.join("lib.a"),
        )],
        integration_files: vec![IntegrationFile::cmake_module(
            layout,
            "FindX.cmake",
            "FindX.cmake",
        )],
    }
}
