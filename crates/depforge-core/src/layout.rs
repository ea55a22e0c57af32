//! Workspace directory layout.
//!
//! All pipelines share one workspace root (normally the directory the tool is
//! invoked from). Directory names under it are fixed so that later pipelines
//! and the consuming build can find what earlier pipelines staged.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Downloaded archives.
pub const CACHE_DIR: &str = "CACHE";
/// Staging root.
pub const DEPS_DIR: &str = "deps";
/// Shared staging tree under `deps/`.
pub const LIBRARIES_DIR: &str = "tob_libraries";
/// Build-system integration descriptors under the shared staging tree.
pub const CMAKE_MODULES_DIR: &str = "cmake_modules";
/// Integration descriptors shipped with the repository.
pub const SCRIPTS_DIR: &str = "scripts";
/// Local patch files.
pub const PATCHES_DIR: &str = "patches";
/// Build records written after successful pipelines.
pub const RECORDS_DIR: &str = ".depforge";

/// Fixed directory layout rooted at the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }

    pub fn deps_dir(&self) -> PathBuf {
        self.root.join(DEPS_DIR)
    }

    /// `deps/tob_libraries`
    pub fn libraries_dir(&self) -> PathBuf {
        self.deps_dir().join(LIBRARIES_DIR)
    }

    /// `deps/tob_libraries/cmake_modules`
    pub fn cmake_modules_dir(&self) -> PathBuf {
        self.libraries_dir().join(CMAKE_MODULES_DIR)
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join(SCRIPTS_DIR)
    }

    pub fn patches_dir(&self) -> PathBuf {
        self.root.join(PATCHES_DIR)
    }

    pub fn records_dir(&self) -> PathBuf {
        self.deps_dir().join(RECORDS_DIR)
    }

    /// Scratch directory for one dependency, e.g. `build_capstone`.
    pub fn build_dir(&self, dependency: &str) -> PathBuf {
        self.root.join(format!("build_{dependency}"))
    }

    /// Location of a downloaded archive in the cache.
    pub fn cached_archive(&self, file_name: &str) -> PathBuf {
        self.cache_dir().join(file_name)
    }
}

/// Ensure a directory exists, creating it (and its parents) if missing.
///
/// Existing directories are reused untouched. Returns `true` when the
/// directory was created by this call.
pub fn ensure_dir(path: &Path) -> PipelineResult<bool> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PipelineError::io(
                format!("Cannot create directory {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
            ));
        }
        return Ok(false);
    }

    fs::create_dir_all(path)
        .map_err(|e| PipelineError::io(format!("Failed to create {}", path.display()), e))?;
    debug!(path = %path.display(), "Created directory");
    Ok(true)
}
