//! Dependency build handlers.

use std::path::PathBuf;

use depforge_core::recipes::{capstone, llvm, triton};
use depforge_core::{PipelineResult, Recipe, RecipeContext};
use depforge_runtime::tools::check_tools;

use crate::bootstrap::CliContext;
use crate::commands::Commands;

/// One dependency to build, with its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Capstone(capstone::CapstoneOptions),
    Triton(triton::TritonOptions),
    Llvm(llvm::LlvmOptions),
}

impl Target {
    pub fn recipe(&self, ctx: &RecipeContext) -> PipelineResult<Recipe> {
        match self {
            Self::Capstone(options) => capstone::recipe(ctx, options),
            Self::Triton(options) => triton::recipe(ctx, options),
            Self::Llvm(options) => llvm::recipe(ctx, options),
        }
    }
}

/// Targets named by a build command, in build order. `probe` yields none.
pub fn targets(command: &Commands) -> Vec<Target> {
    match command {
        Commands::Capstone { branch, .. } => vec![Target::Capstone(capstone::CapstoneOptions {
            branch: branch.clone(),
        })],
        Commands::Triton {
            commit,
            no_patch,
            python_dir,
            ..
        } => vec![Target::Triton(triton_options(commit, *no_patch, python_dir.clone()))],
        Commands::Llvm { version, .. } => vec![Target::Llvm(llvm::LlvmOptions {
            version: version.clone(),
        })],
        // Triton links the Capstone staged just before it
        Commands::All { .. } => vec![
            Target::Capstone(capstone::CapstoneOptions::default()),
            Target::Triton(triton::TritonOptions::default()),
            Target::Llvm(llvm::LlvmOptions::default()),
        ],
        Commands::Probe => Vec::new(),
    }
}

fn triton_options(commit: &str, no_patch: bool, python_dir: Option<PathBuf>) -> triton::TritonOptions {
    triton::TritonOptions {
        commit: commit.to_string(),
        apply_patches: !no_patch,
        python_dir,
    }
}

/// Build each target in order, stopping at the first failure.
pub async fn execute(ctx: &CliContext, targets: &[Target]) -> PipelineResult<()> {
    let pipeline = ctx.pipeline();
    let recipe_ctx = pipeline.context();

    for target in targets {
        let recipe = target.recipe(&recipe_ctx)?;
        check_tools(&recipe.required_tools());
        pipeline.run(&recipe).await?;
    }

    println!();
    println!("✓ Staged dependencies under {}", ctx.config.layout().deps_dir().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use depforge_core::BuildMode;

    #[test]
    fn test_all_builds_in_order() {
        let names: Vec<_> = targets(&Commands::All {
            mode: BuildMode::Release,
        })
        .iter()
        .map(|t| match t {
            Target::Capstone(_) => "capstone",
            Target::Triton(_) => "triton",
            Target::Llvm(_) => "llvm",
        })
        .collect();
        assert_eq!(names, ["capstone", "triton", "llvm"]);
    }

    #[test]
    fn test_triton_options_from_flags() {
        let command = Commands::Triton {
            commit: "abc".to_string(),
            mode: BuildMode::Debug,
            no_patch: true,
            python_dir: None,
        };
        assert_eq!(
            targets(&command),
            [Target::Triton(triton::TritonOptions {
                commit: "abc".to_string(),
                apply_patches: false,
                python_dir: None,
            })]
        );
    }

    #[test]
    fn test_probe_has_no_targets() {
        assert!(targets(&Commands::Probe).is_empty());
    }
}
