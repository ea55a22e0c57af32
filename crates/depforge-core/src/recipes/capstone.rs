//! Capstone disassembler (x86 only).

use std::path::PathBuf;

use crate::error::PipelineResult;
use crate::layout::WorkspaceLayout;
use crate::os::OsFamily;

use super::{
    ArtifactSpec, BuildTool, CompileSpec, ConfigureSpec, GitSource, IntegrationFile, Recipe,
    RecipeContext, StagingSpec, define,
};

pub const CAPSTONE_URL: &str = "https://github.com/aquynh/capstone";
pub const DEFAULT_BRANCH: &str = "master";

/// Architectures compiled out; only the x86 backend is kept.
const DISABLED_ARCHITECTURES: &[&str] = &[
    "TMS320C64X",
    "MOS65XX",
    "SPARC",
    "ARM64",
    "M680X",
    "XCORE",
    "M68K",
    "MIPS",
    "SYSZ",
    "PPC",
    "ARM",
    "EVM",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapstoneOptions {
    pub branch: String,
}

impl Default for CapstoneOptions {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

/// `deps/tob_libraries/capstone`
pub fn staging_dir(layout: &WorkspaceLayout) -> PathBuf {
    layout.libraries_dir().join("capstone")
}

/// Header directory consumed by dependents (Triton).
pub fn staged_include_dir(layout: &WorkspaceLayout) -> PathBuf {
    staging_dir(layout).join("include")
}

/// Static library consumed by dependents (Triton).
pub fn staged_static_library(layout: &WorkspaceLayout, os: &OsFamily) -> PathBuf {
    let prefix = if os.is_windows() { "" } else { "lib" };
    staging_dir(layout).join(format!(
        "{prefix}capstone_static.{}",
        os.static_library_extension()
    ))
}

pub fn recipe(ctx: &RecipeContext, options: &CapstoneOptions) -> PipelineResult<Recipe> {
    let generator = ctx.native_generator()?;
    let layout = &ctx.layout;
    let build_root = layout.build_dir("capstone");
    let checkout = build_root.join("capstone");
    let cmake_dir = checkout.join("build");
    let staging = staging_dir(layout);

    // The v3 headers use `#include <capstone/...>` paths
    let include_dest = if options.branch == "v3" {
        staging.join("include").join("capstone")
    } else {
        staging.join("include")
    };

    let mut flags = vec![
        "-DCMAKE_CXX_FLAGS=\"-march=native\"".to_string(),
        define("CMAKE_BUILD_TYPE", ctx.mode),
        define("CAPSTONE_BUILD_CSTOOL", "no"),
        define("CAPSTONE_BUILD_TESTS", "no"),
    ];
    flags.extend(
        DISABLED_ARCHITECTURES
            .iter()
            .map(|arch| define(&format!("CAPSTONE_{arch}_SUPPORT"), 0)),
    );
    flags.push(define("CAPSTONE_X86_M680X", 0));

    let prefix = ctx.library_prefix();
    let shared = format!("{prefix}capstone.{}", ctx.os.shared_library_extension());
    let static_lib = format!("{prefix}capstone.{}", ctx.os.static_library_extension());

    let artifacts = vec![
        ArtifactSpec::optional("include", &checkout, include_dest),
        ArtifactSpec::required(&shared, &cmake_dir, staging.join(&shared)),
        ArtifactSpec::required(
            &static_lib,
            &cmake_dir,
            staged_static_library(layout, &ctx.os),
        ),
    ];

    Ok(Recipe {
        name: "capstone".to_string(),
        display_name: "Capstone".to_string(),
        version: options.branch.clone(),
        build_dir: build_root,
        git: Some(GitSource {
            url: CAPSTONE_URL.to_string(),
            checkout_dir: checkout,
            branch: options.branch.clone(),
            commit: None,
            patches: Vec::new(),
        }),
        archives: Vec::new(),
        staging: vec![StagingSpec::reset(staging)],
        configure: ConfigureSpec {
            working_dir: cmake_dir.clone(),
            generator,
            flags,
            source: "..".to_string(),
        },
        compile: CompileSpec {
            tool: BuildTool::for_generator(generator),
            working_dir: cmake_dir,
            must_succeed: true,
            install: false,
        },
        artifacts,
        integration_files: vec![IntegrationFile::cmake_module(
            layout,
            "FindCapstone.cmake",
            "FindCAPSTONE.cmake",
        )],
    })
}
