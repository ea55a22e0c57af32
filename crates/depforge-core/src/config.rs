//! Pipeline configuration: workspace root, parallelism and build mode.
//!
//! Values are resolved in priority order: explicit flag, environment
//! variable, default. Environment access goes through a lookup closure so the
//! resolution can be tested without mutating the process environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::layout::WorkspaceLayout;

/// Workspace root override.
pub const ROOT_ENV: &str = "DEPFORGE_ROOT";
/// Parallelism override.
pub const JOBS_ENV: &str = "DEPFORGE_JOBS";
/// Parallelism override honoured for compatibility with CMake tooling.
pub const CMAKE_PARALLEL_ENV: &str = "CMAKE_BUILD_PARALLEL_LEVEL";

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildMode {
    #[default]
    Release,
    Debug,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::Debug => "Debug",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "release" => Ok(Self::Release),
            "debug" => Ok(Self::Debug),
            "relwithdebinfo" => Ok(Self::RelWithDebInfo),
            "minsizerel" => Ok(Self::MinSizeRel),
            other => Err(PipelineError::Config(format!(
                "unknown build mode '{other}' (expected Release, Debug, RelWithDebInfo or MinSizeRel)"
            ))),
        }
    }
}

/// Resolved settings shared by every pipeline in one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub root: PathBuf,
    /// Explicit parallelism; `None` means "use the logical CPU count".
    pub jobs: Option<usize>,
    pub mode: BuildMode,
}

impl PipelineConfig {
    /// Resolve configuration from flags and an environment lookup.
    ///
    /// `cwd` is the fallback workspace root and the base for a relative
    /// root, since recipe paths end up in commands run from other directories.
    pub fn resolve<F>(
        root_flag: Option<PathBuf>,
        jobs_flag: Option<usize>,
        mode: BuildMode,
        cwd: PathBuf,
        env: F,
    ) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = match root_flag
            .or_else(|| env(ROOT_ENV).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        {
            Some(root) if root.is_relative() => cwd.join(root),
            Some(root) => root,
            None => cwd,
        };

        let jobs = match jobs_flag {
            Some(0) => {
                return Err(PipelineError::Config("--jobs must be at least 1".to_string()));
            }
            Some(n) => Some(n),
            None => jobs_from_env(&env)?,
        };

        Ok(Self { root, jobs, mode })
    }

    pub fn layout(&self) -> WorkspaceLayout {
        WorkspaceLayout::new(self.root.clone())
    }

    /// Parallelism hint for the native build tool, never below 1.
    pub fn parallelism(&self, logical_cpus: usize) -> usize {
        self.jobs.unwrap_or(logical_cpus).max(1)
    }
}

fn jobs_from_env<F>(env: &F) -> PipelineResult<Option<usize>>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = env(JOBS_ENV) {
        return match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(PipelineError::Config(format!(
                "{JOBS_ENV} must be a positive integer, got '{raw}'"
            ))),
        };
    }

    // Same leniency as CMake: ignore values that are not positive integers
    Ok(env(CMAKE_PARALLEL_ENV)
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|n| *n > 0))
}
