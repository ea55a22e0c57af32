//! Core domain types and port definitions for depforge.
//!
//! This crate is pure: it describes *what* a dependency build looks like
//! (recipes, workspace layout, command invocations, errors) and declares the
//! ports through which the runtime performs side effects. Process spawning,
//! HTTP downloads and filesystem walking live in `depforge-runtime`.

#![deny(unused_crate_dependencies)]

pub mod command;
pub mod config;
pub mod error;
pub mod layout;
pub mod os;
pub mod ports;
pub mod recipes;
pub mod record;

pub use command::CommandInvocation;
pub use config::{BuildMode, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use layout::{WorkspaceLayout, ensure_dir};
pub use os::{Generator, OsFamily};
pub use ports::{ArchiveDownloader, CommandRunner, EnvironmentProbe};
pub use recipes::{
    ArchiveFormat, ArchiveSpec, ArtifactSpec, BuildTool, CompileSpec, ConfigureSpec, GitSource,
    IntegrationFile, Recipe, RecipeContext, StagingSpec,
};
pub use record::BuildRecord;

#[cfg(test)]
use tempfile as _;
