//! Subcommand definitions.

use std::path::PathBuf;

use clap::Subcommand;
use depforge_core::BuildMode;
use depforge_core::recipes::{capstone, llvm, triton};

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Build the Capstone disassembler and stage it under deps/tob_libraries
    Capstone {
        /// Branch to build
        #[arg(long, default_value = capstone::DEFAULT_BRANCH)]
        branch: String,
        /// CMake build type
        #[arg(long, default_value = "Release")]
        mode: BuildMode,
    },

    /// Build Triton against prebuilt Z3 and Boost
    Triton {
        /// Commit to pin the checkout to
        #[arg(long, default_value = triton::DEFAULT_COMMIT)]
        commit: String,
        /// CMake build type
        #[arg(long, default_value = "Release")]
        mode: BuildMode,
        /// Skip applying local patches
        #[arg(long)]
        no_patch: bool,
        /// Python installation prefix (Windows only)
        #[arg(long, env = "DEPFORGE_PYTHON_DIR")]
        python_dir: Option<PathBuf>,
    },

    /// Build LLVM and Clang from release sources
    Llvm {
        /// Release version to build
        #[arg(long, default_value = llvm::DEFAULT_VERSION)]
        version: String,
        /// CMake build type
        #[arg(long, default_value = "Release")]
        mode: BuildMode,
    },

    /// Build Capstone, Triton and LLVM in order
    All {
        /// CMake build type
        #[arg(long, default_value = "Release")]
        mode: BuildMode,
    },

    /// Show the host OS, CPU count, CMake generator and recorded builds
    Probe,
}

impl Commands {
    /// Build mode requested by the command.
    pub const fn mode(&self) -> BuildMode {
        match self {
            Self::Capstone { mode, .. }
            | Self::Triton { mode, .. }
            | Self::Llvm { mode, .. }
            | Self::All { mode } => *mode,
            Self::Probe => BuildMode::Release,
        }
    }
}
