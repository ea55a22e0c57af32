//! Cross-recipe checks over every supported OS.

use std::path::Path;

use depforge_core::recipes::{capstone, llvm, triton};
use depforge_core::{BuildMode, OsFamily, PipelineConfig, Recipe, RecipeContext, WorkspaceLayout};

const ROOT: &str = "/ws";

fn all_recipes(os: OsFamily) -> Vec<Recipe> {
    let ctx = RecipeContext::new(os, BuildMode::Release, WorkspaceLayout::new(ROOT));
    vec![
        capstone::recipe(&ctx, &capstone::CapstoneOptions::default()).unwrap(),
        triton::recipe(&ctx, &triton::TritonOptions::default()).unwrap(),
        llvm::recipe(&ctx, &llvm::LlvmOptions::default()).unwrap(),
    ]
}

fn supported() -> [OsFamily; 3] {
    [OsFamily::Windows, OsFamily::Linux, OsFamily::MacOs]
}

#[test]
fn test_every_path_stays_in_workspace() {
    let root = Path::new(ROOT);
    for os in supported() {
        for recipe in all_recipes(os.clone()) {
            assert!(recipe.build_dir.starts_with(root), "{}", recipe.name);
            for artifact in &recipe.artifacts {
                assert!(artifact.search_root.starts_with(root));
                assert!(artifact.destination.starts_with(root.join("deps")));
            }
            for archive in &recipe.archives {
                assert!(archive.installed_path().starts_with(root));
            }
            for file in &recipe.integration_files {
                assert!(file.source.starts_with(root.join("scripts")));
                assert!(
                    file.destination
                        .starts_with(root.join("deps/tob_libraries/cmake_modules"))
                );
            }
        }
    }
}

#[test]
fn test_configure_uses_native_generator_except_llvm() {
    for os in supported() {
        let native = os_generator_token(&os);
        for recipe in all_recipes(os.clone()) {
            let line = recipe.configure.command_line();
            if recipe.name == "llvm" {
                assert!(line.starts_with("cmake -G \"Ninja\""));
            } else {
                assert!(line.starts_with(&format!("cmake -G \"{native}\"")), "{line}");
            }
        }
    }
}

fn os_generator_token(os: &OsFamily) -> &'static str {
    if os.is_windows() {
        "Visual Studio 15 2017 Win64"
    } else {
        "Unix Makefiles"
    }
}

#[test]
fn test_recipes_are_deterministic() {
    for os in supported() {
        let first: Vec<_> = all_recipes(os.clone())
            .into_iter()
            .map(|r| r.configure.command_line())
            .collect();
        let second: Vec<_> = all_recipes(os)
            .into_iter()
            .map(|r| r.configure.command_line())
            .collect();
        assert_eq!(first, second);
    }
}

#[test]
fn test_required_tools() {
    let recipes = all_recipes(OsFamily::Linux);
    assert_eq!(recipes[0].required_tools(), ["git", "cmake", "make"]);
    assert_eq!(recipes[2].required_tools(), ["cmake", "ninja"]);

    let windows = all_recipes(OsFamily::Windows);
    assert_eq!(windows[0].required_tools(), ["git", "cmake"]);
}

#[test]
fn test_relative_root_yields_absolute_command_paths() {
    let cwd = std::env::temp_dir();
    let config = PipelineConfig::resolve(
        Some("ws".into()),
        None,
        BuildMode::Release,
        cwd.clone(),
        |_| None,
    )
    .unwrap();
    let ctx = RecipeContext::new(OsFamily::Linux, config.mode, config.layout());

    let recipe = triton::recipe(&ctx, &triton::TritonOptions::default()).unwrap();
    let git = recipe.git.as_ref().unwrap();
    assert!(git.patches.iter().all(|p| p.is_absolute()));
    assert!(git.checkout_dir.is_absolute());
    assert!(recipe.configure.working_dir.is_absolute());

    let boost_root = cwd.join("ws").join("deps").join("boost_1_72_0");
    assert!(
        recipe.configure.command_line().contains(&boost_root.display().to_string()),
        "{}",
        recipe.configure.command_line()
    );

    let llvm = llvm::recipe(&ctx, &llvm::LlvmOptions::default()).unwrap();
    let prefix = cwd.join("ws").join("deps").join("tob_libraries").join("llvm");
    assert!(llvm.configure.command_line().contains(&prefix.display().to_string()));
}
