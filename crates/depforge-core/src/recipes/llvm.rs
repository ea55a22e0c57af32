//! LLVM with Clang, built from release source tarballs and installed into the
//! shared staging tree.

use std::path::PathBuf;

use crate::error::PipelineResult;
use crate::layout::WorkspaceLayout;
use crate::os::Generator;

use super::{
    ArchiveSpec, BuildTool, CompileSpec, ConfigureSpec, Recipe, RecipeContext, StagingSpec,
    define, define_path,
};

pub const DEFAULT_VERSION: &str = "9.0.1";
const RELEASE_URL: &str = "https://github.com/llvm/llvm-project/releases/download";
const TARGETS: &str = "X86;AArch64";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlvmOptions {
    pub version: String,
}

impl Default for LlvmOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

/// `deps/tob_libraries/llvm`
pub fn install_prefix(layout: &WorkspaceLayout) -> PathBuf {
    layout.libraries_dir().join("llvm")
}

fn source_archive(project: &str, version: &str, extract_to: PathBuf) -> ArchiveSpec {
    let top_dir = format!("{project}-{version}.src");
    let file_name = format!("{top_dir}.tar.xz");
    ArchiveSpec {
        url: format!("{RELEASE_URL}/llvmorg-{version}/{file_name}"),
        file_name,
        extract_to,
        top_dir,
        rename_to: None,
    }
}

pub fn recipe(ctx: &RecipeContext, options: &LlvmOptions) -> PipelineResult<Recipe> {
    // Fail early on unsupported hosts even though Ninja is used everywhere
    ctx.native_generator()?;

    let layout = &ctx.layout;
    let version = &options.version;
    let build_root = layout.build_dir("llvm");
    let llvm_src = format!("llvm-{version}.src");
    let prefix = install_prefix(layout);

    let llvm = source_archive("llvm", version, build_root.clone());
    // Clang builds in-tree as llvm/tools/clang
    let clang = ArchiveSpec {
        rename_to: Some(build_root.join(&llvm_src).join("tools").join("clang")),
        ..source_archive("clang", version, build_root.clone())
    };

    let flags = vec![
        "-DCMAKE_CXX_FLAGS=\"-march=native\"".to_string(),
        define("CMAKE_BUILD_TYPE", ctx.mode),
        define_path("CMAKE_INSTALL_PREFIX", &prefix),
        format!("-DLLVM_TARGETS_TO_BUILD=\"{TARGETS}\""),
        define("LLVM_BUILD_TESTS", "False"),
        define("LLVM_INCLUDE_TESTS", "False"),
        define("LLVM_INCLUDE_BENCHMARKS", "False"),
        define("LLVM_ENABLE_ASSERTIONS", "True"),
        define("LLVM_BUILD_DOCS", "False"),
        define("LLVM_ENABLE_DOXYGEN", "False"),
        define("LLVM_ENABLE_DUMP", "True"),
        define("LLVM_ENABLE_RTTI", "True"),
    ];

    Ok(Recipe {
        name: "llvm".to_string(),
        display_name: "LLVM".to_string(),
        version: version.clone(),
        build_dir: build_root.clone(),
        git: None,
        archives: vec![llvm, clang],
        staging: vec![StagingSpec::create(&prefix)],
        configure: ConfigureSpec {
            working_dir: build_root.clone(),
            generator: Generator::Ninja,
            flags,
            source: llvm_src,
        },
        compile: CompileSpec {
            tool: BuildTool::Ninja,
            working_dir: build_root,
            must_succeed: true,
            install: true,
        },
        artifacts: Vec::new(),
        integration_files: Vec::new(),
    })
}
