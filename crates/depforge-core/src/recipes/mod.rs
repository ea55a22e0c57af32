//! Dependency recipes.
//!
//! A [`Recipe`] is plain data describing one fetch-build-stage run: where the
//! sources come from, how CMake is configured, which build tool compiles it
//! and which artifacts end up in the staging tree. Recipes are produced by pure
//! functions of the host OS, the build mode and the workspace layout, so the
//! same inputs always yield the same recipe.

pub mod capstone;
pub mod llvm;
pub mod triton;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::command::quote;
use crate::config::BuildMode;
use crate::error::PipelineResult;
use crate::layout::WorkspaceLayout;
use crate::os::{Generator, OsFamily};

/// Inputs shared by every recipe function.
#[derive(Debug, Clone)]
pub struct RecipeContext {
    pub os: OsFamily,
    pub mode: BuildMode,
    pub layout: WorkspaceLayout,
}

impl RecipeContext {
    pub const fn new(os: OsFamily, mode: BuildMode, layout: WorkspaceLayout) -> Self {
        Self { os, mode, layout }
    }

    /// Native generator for the context's OS; fails on unsupported platforms.
    pub fn native_generator(&self) -> PipelineResult<Generator> {
        Generator::for_os(&self.os)
    }

    /// `lib` on Unix-like systems, empty on Windows.
    pub const fn library_prefix(&self) -> &'static str {
        if self.os.is_windows() { "" } else { "lib" }
    }
}

/// Everything needed to fetch, build and stage one dependency.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Short lowercase name, also used for `build_<name>` and the build record.
    pub name: String,
    pub display_name: String,
    /// Branch, commit or release version being built.
    pub version: String,
    /// Per-dependency scratch directory.
    pub build_dir: PathBuf,
    pub git: Option<GitSource>,
    /// Archives downloaded into the cache and extracted, in order.
    pub archives: Vec<ArchiveSpec>,
    pub staging: Vec<StagingSpec>,
    pub configure: ConfigureSpec,
    pub compile: CompileSpec,
    pub artifacts: Vec<ArtifactSpec>,
    pub integration_files: Vec<IntegrationFile>,
}

impl Recipe {
    /// External programs the recipe will invoke.
    pub fn required_tools(&self) -> Vec<&'static str> {
        let mut tools = Vec::new();
        if self.git.is_some() {
            tools.push("git");
        }
        tools.push("cmake");
        let program = self.compile.tool.program();
        if !tools.contains(&program) {
            tools.push(program);
        }
        tools
    }
}

/// A git checkout pinned to a branch and optionally a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    pub url: String,
    pub checkout_dir: PathBuf,
    pub branch: String,
    /// Exact commit to pin to after updating `branch`.
    pub commit: Option<String>,
    /// Patches applied with `git am`; failures are tolerated.
    pub patches: Vec<PathBuf>,
}

/// Staging directory prepared before the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingSpec {
    pub dir: PathBuf,
    /// Remove any previous contents first.
    pub reset: bool,
}

impl StagingSpec {
    pub fn create(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            reset: false,
        }
    }

    pub fn reset(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            reset: true,
        }
    }
}

/// A file or directory located by name under `search_root` and copied to
/// `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub name: String,
    pub search_root: PathBuf,
    pub destination: PathBuf,
    /// A missing required artifact stops the pipeline.
    pub required: bool,
}

impl ArtifactSpec {
    pub fn required(
        name: impl Into<String>,
        search_root: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            search_root: search_root.into(),
            destination: destination.into(),
            required: true,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        search_root: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, search_root, destination)
        }
    }
}

/// Build-system descriptor copied from the repository into the staging tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl IntegrationFile {
    /// `scripts/<source_name>` → `deps/tob_libraries/cmake_modules/<dest_name>`
    pub fn cmake_module(layout: &WorkspaceLayout, source_name: &str, dest_name: &str) -> Self {
        Self {
            source: layout.scripts_dir().join(source_name),
            destination: layout.cmake_modules_dir().join(dest_name),
        }
    }
}

/// Supported archive formats, detected from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
    TarXz,
    SevenZip,
}

impl ArchiveFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".tar.xz") {
            Some(Self::TarXz)
        } else if lower.ends_with(".7z") {
            Some(Self::SevenZip)
        } else {
            None
        }
    }
}

/// A release archive: downloaded once into the cache, extracted once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSpec {
    pub url: String,
    /// File name inside the cache directory.
    pub file_name: String,
    /// Directory the archive is extracted into.
    pub extract_to: PathBuf,
    /// Name of the single top-level directory inside the archive.
    pub top_dir: String,
    /// Final location of `top_dir`, when it must be renamed after extraction.
    pub rename_to: Option<PathBuf>,
}

impl ArchiveSpec {
    /// Where the extracted tree lives once this archive has been processed.
    ///
    /// Extraction is skipped when this path already exists.
    pub fn installed_path(&self) -> PathBuf {
        self.rename_to
            .clone()
            .unwrap_or_else(|| self.extract_to.join(&self.top_dir))
    }

    pub fn format(&self) -> Option<ArchiveFormat> {
        ArchiveFormat::from_file_name(&self.file_name)
    }
}

/// `cmake -G <generator> <flags> <source>` run from `working_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureSpec {
    pub working_dir: PathBuf,
    pub generator: Generator,
    pub flags: Vec<String>,
    /// Source directory argument, relative to `working_dir` or absolute.
    pub source: String,
}

impl ConfigureSpec {
    pub fn command_line(&self) -> String {
        let mut line = format!("cmake -G \"{}\"", self.generator.token());
        for flag in &self.flags {
            line.push(' ');
            line.push_str(flag);
        }
        line.push(' ');
        line.push_str(&self.source);
        line
    }
}

/// `-D<name>=<value>`
pub fn define(name: &str, value: impl std::fmt::Display) -> String {
    format!("-D{name}={value}")
}

/// `-D<name>="<path>"`
pub fn define_path(name: &str, path: &Path) -> String {
    format!("-D{name}={}", quote(path))
}

/// Native build tool driving the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildTool {
    /// `cmake --build` over an MSBuild solution.
    CmakeBuild,
    Make,
    Ninja,
}

impl BuildTool {
    pub const fn for_generator(generator: Generator) -> Self {
        match generator {
            Generator::VisualStudio2017Win64 => Self::CmakeBuild,
            Generator::UnixMakefiles => Self::Make,
            Generator::Ninja => Self::Ninja,
        }
    }

    pub const fn program(&self) -> &'static str {
        match self {
            Self::CmakeBuild => "cmake",
            Self::Make => "make",
            Self::Ninja => "ninja",
        }
    }

    /// Compile command with a parallelism hint.
    pub fn compile_command(&self, mode: BuildMode, jobs: usize) -> String {
        match self {
            Self::CmakeBuild => format!("cmake --build . --config {mode} -- /maxcpucount:{jobs}"),
            Self::Make => format!("make -j{jobs}"),
            Self::Ninja => format!("ninja -j{jobs}"),
        }
    }

    pub fn install_command(&self, mode: BuildMode) -> String {
        match self {
            Self::CmakeBuild => format!("cmake --build . --config {mode} --target INSTALL"),
            Self::Make => "make install".to_string(),
            Self::Ninja => "ninja install".to_string(),
        }
    }
}

/// How the configured project is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSpec {
    pub tool: BuildTool,
    pub working_dir: PathBuf,
    /// Some upstream builds fail on secondary targets while still producing
    /// the library; those recipes tolerate a failing compile and rely on the
    /// artifact check instead.
    pub must_succeed: bool,
    /// Run the install target after compiling.
    pub install: bool,
}
