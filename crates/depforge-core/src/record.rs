//! Build records.
//!
//! A record is written to `deps/.depforge/<dependency>.json` after a pipeline
//! finishes, so later runs (and humans) can see what was staged and how.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::layout::ensure_dir;
use crate::recipes::Recipe;

/// What was built, when, and with which CMake flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub dependency: String,
    /// Branch, commit or release version
    pub version: String,
    pub build_date: DateTime<Utc>,
    pub build_mode: String,
    pub os: String,
    pub generator: String,
    pub cmake_flags: Vec<String>,
}

impl BuildRecord {
    /// Record a finished recipe run.
    pub fn from_recipe(recipe: &Recipe, os: &str, build_mode: &str) -> Self {
        Self {
            dependency: recipe.name.clone(),
            version: recipe.version.clone(),
            build_date: Utc::now(),
            build_mode: build_mode.to_string(),
            os: os.to_string(),
            generator: recipe.configure.generator.token().to_string(),
            cmake_flags: recipe.configure.flags.clone(),
        }
    }

    /// Path of the record for `dependency` inside `records_dir`.
    pub fn path_in(records_dir: &Path, dependency: &str) -> PathBuf {
        records_dir.join(format!("{dependency}.json"))
    }

    /// Write the record into `records_dir`, replacing any previous one.
    pub fn save(&self, records_dir: &Path) -> PipelineResult<PathBuf> {
        ensure_dir(records_dir)?;
        let path = Self::path_in(records_dir, &self.dependency);
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            PipelineError::io("Failed to serialize build record", e.into())
        })?;
        fs::write(&path, json)
            .map_err(|e| PipelineError::io(format!("Failed to write {}", path.display()), e))?;
        Ok(path)
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| PipelineError::io(format!("Failed to read {}", path.display()), e))?;
        serde_json::from_str(&json)
            .map_err(|e| PipelineError::io(format!("Failed to parse {}", path.display()), e.into()))
    }

    /// All readable records in `records_dir`, sorted by dependency name.
    ///
    /// A missing directory yields an empty list; unparsable files are skipped.
    pub fn list(records_dir: &Path) -> PipelineResult<Vec<Self>> {
        if !records_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(records_dir).map_err(|e| {
            PipelineError::io(format!("Failed to read {}", records_dir.display()), e)
        })?;

        let mut records: Vec<Self> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| match Self::load(&path) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable build record");
                    None
                }
            })
            .collect();
        records.sort_by(|a, b| a.dependency.cmp(&b.dependency));
        Ok(records)
    }
}
