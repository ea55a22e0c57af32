//! Triton symbolic execution library, built against prebuilt Z3 and Boost.
//!
//! On Linux and macOS Triton links the Capstone staged by the capstone
//! recipe; on Windows a prebuilt Capstone release is downloaded instead.

use std::path::PathBuf;

use crate::error::{PipelineError, PipelineResult};
use crate::layout::WorkspaceLayout;
use crate::os::OsFamily;

use super::{
    ArchiveSpec, ArtifactSpec, BuildTool, CompileSpec, ConfigureSpec, GitSource, IntegrationFile,
    Recipe, RecipeContext, StagingSpec, capstone, define, define_path,
};

pub const TRITON_URL: &str = "https://github.com/JonathanSalwan/Triton";
/// Pinned upstream commit. Later commits break the reserved-flag handling
/// fixed by `0001-Fixed-reserved-flag.patch`.
pub const DEFAULT_COMMIT: &str = "fb3241e94a3e1d0be9831bfc7a865246ee4c9e30";
pub const PATCH_FILE: &str = "0001-Fixed-reserved-flag.patch";

const Z3_VERSION: &str = "4.8.7";
const BOOST_DIR: &str = "boost_1_72_0";
const BOOST_URL: &str = "https://archives.boost.io/release/1.72.0/source";
const WIN_CAPSTONE_DIR: &str = "capstone-4.0.1-win64";
const WIN_CAPSTONE_URL: &str = "https://github.com/aquynh/capstone/releases/download/4.0.1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TritonOptions {
    pub commit: String,
    pub apply_patches: bool,
    /// Python installation prefix, passed to CMake on Windows.
    pub python_dir: Option<PathBuf>,
}

impl Default for TritonOptions {
    fn default() -> Self {
        Self {
            commit: DEFAULT_COMMIT.to_string(),
            apply_patches: true,
            python_dir: None,
        }
    }
}

/// Prebuilt Z3 release for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Z3Release {
    /// Top-level directory inside the archive.
    pub dir_name: String,
    pub archive: String,
    pub url: String,
}

/// Select the prebuilt Z3 release for `os`.
pub fn z3_release(os: &OsFamily) -> PipelineResult<Z3Release> {
    let platform = match os {
        OsFamily::Windows => "x64-win",
        OsFamily::Linux => "x64-ubuntu-16.04",
        OsFamily::MacOs => "x64-osx-10.14.6",
        OsFamily::Unsupported(name) => {
            return Err(PipelineError::UnsupportedOs { name: name.clone() });
        }
    };
    let dir_name = format!("z3-{Z3_VERSION}-{platform}");
    let archive = format!("{dir_name}.zip");
    let url = format!("https://github.com/Z3Prover/z3/releases/download/z3-{Z3_VERSION}/{archive}");
    Ok(Z3Release {
        dir_name,
        archive,
        url,
    })
}

/// `deps/triton`
pub fn staging_dir(layout: &WorkspaceLayout) -> PathBuf {
    layout.deps_dir().join("triton")
}

fn z3_archive(layout: &WorkspaceLayout, release: Z3Release) -> ArchiveSpec {
    ArchiveSpec {
        url: release.url,
        file_name: release.archive,
        extract_to: layout.deps_dir(),
        top_dir: release.dir_name,
        rename_to: Some(layout.deps_dir().join("z3")),
    }
}

fn boost_archive(layout: &WorkspaceLayout) -> ArchiveSpec {
    let file_name = format!("{BOOST_DIR}.7z");
    ArchiveSpec {
        url: format!("{BOOST_URL}/{file_name}"),
        file_name,
        extract_to: layout.deps_dir(),
        top_dir: BOOST_DIR.to_string(),
        rename_to: None,
    }
}

fn windows_capstone_archive(layout: &WorkspaceLayout) -> ArchiveSpec {
    let file_name = format!("{WIN_CAPSTONE_DIR}.zip");
    ArchiveSpec {
        url: format!("{WIN_CAPSTONE_URL}/{file_name}"),
        file_name,
        extract_to: layout.deps_dir(),
        top_dir: WIN_CAPSTONE_DIR.to_string(),
        rename_to: None,
    }
}

fn windows_flags(layout: &WorkspaceLayout, options: &TritonOptions) -> Vec<String> {
    let deps = layout.deps_dir();
    let z3 = deps.join("z3");
    let capstone = deps.join(WIN_CAPSTONE_DIR);

    let mut flags = vec![
        define("KERNEL4", "OFF"),
        define("PYTHON_BINDINGS", "OFF"),
        define_path("BOOST_ROOT", &deps.join(BOOST_DIR)),
    ];
    if let Some(python) = &options.python_dir {
        flags.push(define_path("PYTHON_INCLUDE_DIRS", &python.join("include")));
        flags.push(define_path(
            "PYTHON_LIBRARIES",
            &python.join("libs").join("python27.lib"),
        ));
    }
    flags.extend([
        define_path("Z3_INCLUDE_DIRS", &z3.join("include")),
        define_path("Z3_LIBRARIES", &z3.join("bin").join("libz3.lib")),
        define_path("CAPSTONE_INCLUDE_DIRS", &capstone.join("include")),
        define_path("CAPSTONE_LIBRARIES", &capstone.join("capstone.lib")),
        "-DCMAKE_CXX_STANDARD_LIBRARIES=\"legacy_stdio_definitions.lib msvcrt.lib msvcmrt.lib\""
            .to_string(),
    ]);
    flags
}

fn unix_flags(ctx: &RecipeContext) -> Vec<String> {
    let layout = &ctx.layout;
    let deps = layout.deps_dir();
    let z3 = deps.join("z3");

    vec![
        define("CMAKE_BUILD_TYPE", ctx.mode),
        "-DCMAKE_CXX_FLAGS=\"-march=native\"".to_string(),
        define_path("BOOST_ROOT", &deps.join(BOOST_DIR)),
        define_path("Z3_INCLUDE_DIRS", &z3.join("include")),
        define_path("Z3_LIBRARIES", &z3.join("bin").join("libz3.a")),
        define_path("CAPSTONE_INCLUDE_DIRS", &capstone::staged_include_dir(layout)),
        define_path(
            "CAPSTONE_LIBRARIES",
            &capstone::staged_static_library(layout, &ctx.os),
        ),
        define("STATICLIB", "ON"),
        define("KERNEL4", "OFF"),
        define("PYTHON_BINDINGS", "OFF"),
    ]
}

fn patches(layout: &WorkspaceLayout, options: &TritonOptions) -> Vec<PathBuf> {
    if options.apply_patches {
        vec![layout.patches_dir().join(PATCH_FILE)]
    } else {
        Vec::new()
    }
}

fn library_name(os: &OsFamily) -> &'static str {
    if os.is_windows() { "triton.lib" } else { "libtriton.a" }
}

pub fn recipe(ctx: &RecipeContext, options: &TritonOptions) -> PipelineResult<Recipe> {
    let generator = ctx.native_generator()?;
    let layout = &ctx.layout;
    let build_root = layout.build_dir("triton");
    let checkout = build_root.join("Triton");
    let cmake_dir = checkout.join("build");
    let staging = staging_dir(layout);

    let mut archives = vec![z3_archive(layout, z3_release(&ctx.os)?), boost_archive(layout)];
    let flags = if ctx.os.is_windows() {
        archives.push(windows_capstone_archive(layout));
        windows_flags(layout, options)
    } else {
        unix_flags(ctx)
    };

    let library = library_name(&ctx.os);

    Ok(Recipe {
        name: "triton".to_string(),
        display_name: "Triton".to_string(),
        version: options.commit.clone(),
        build_dir: build_root,
        git: Some(GitSource {
            url: TRITON_URL.to_string(),
            checkout_dir: checkout.clone(),
            branch: "master".to_string(),
            commit: Some(options.commit.clone()),
            patches: patches(layout, options),
        }),
        archives,
        staging: vec![StagingSpec::create(&staging)],
        configure: ConfigureSpec {
            working_dir: cmake_dir.clone(),
            generator,
            flags,
            source: "..".to_string(),
        },
        compile: CompileSpec {
            tool: BuildTool::for_generator(generator),
            working_dir: cmake_dir.clone(),
            // Unix builds can fail on the tests target after libtriton.a is
            // produced; the artifact check below decides.
            must_succeed: ctx.os.is_windows(),
            install: false,
        },
        artifacts: vec![
            ArtifactSpec::optional("includes", checkout.join("src"), staging.join("includes")),
            ArtifactSpec::required(library, &cmake_dir, staging.join(library)),
        ],
        integration_files: vec![
            IntegrationFile::cmake_module(layout, "FindTriton.cmake", "FindTRITON.cmake"),
            IntegrationFile::cmake_module(layout, "FindBoost.cmake", "FindBOOST.cmake"),
            IntegrationFile::cmake_module(layout, "FindZ3.cmake", "FindZ3.cmake"),
        ],
    })
}
