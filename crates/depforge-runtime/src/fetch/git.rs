//! Git checkout handling.

use depforge_core::command::quote;
use depforge_core::{CommandInvocation, CommandRunner, GitSource, PipelineResult};
use tracing::info;

/// Clone `source` unless its checkout directory already exists.
///
/// Returns `true` when a clone was made.
pub fn clone_if_missing(runner: &dyn CommandRunner, source: &GitSource) -> PipelineResult<bool> {
    if source.checkout_dir.exists() {
        info!(dir = %source.checkout_dir.display(), "Reusing existing checkout");
        return Ok(false);
    }

    println!("Cloning {}...", source.url);
    runner.execute(&CommandInvocation::new(format!(
        "git clone {} {}",
        source.url,
        quote(&source.checkout_dir)
    )))?;
    Ok(true)
}

/// Commands that bring an existing checkout to the wanted revision.
pub fn pin_commands(source: &GitSource) -> Vec<CommandInvocation> {
    let dir = &source.checkout_dir;
    let mut commands = vec![
        CommandInvocation::new(format!("git checkout {}", source.branch)).in_dir(dir),
        CommandInvocation::new("git pull").in_dir(dir),
    ];

    if let Some(commit) = &source.commit {
        commands.push(CommandInvocation::new(format!("git fetch origin {commit}")).in_dir(dir));
        commands.push(CommandInvocation::new(format!("git checkout {commit}")).in_dir(dir));
    }

    // Patches may already be applied on a re-run
    commands.extend(source.patches.iter().map(|patch| {
        CommandInvocation::optional(format!("git am --signoff < {}", quote(patch))).in_dir(dir)
    }));

    commands
}

/// Update the checkout, pin it and apply local patches.
pub fn pin(runner: &dyn CommandRunner, source: &GitSource) -> PipelineResult<()> {
    for invocation in pin_commands(source) {
        runner.execute(&invocation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source() -> GitSource {
        GitSource {
            url: "https://github.com/JonathanSalwan/Triton".to_string(),
            checkout_dir: PathBuf::from("/w/build_triton/Triton"),
            branch: "master".to_string(),
            commit: Some("fb3241e".to_string()),
            patches: vec![PathBuf::from("/w/patches/0001-fix.patch")],
        }
    }

    #[test]
    fn test_pin_commands_order() {
        let lines: Vec<_> = pin_commands(&source())
            .into_iter()
            .map(|c| c.command_line)
            .collect();
        assert_eq!(
            lines,
            [
                "git checkout master",
                "git pull",
                "git fetch origin fb3241e",
                "git checkout fb3241e",
                "git am --signoff < \"/w/patches/0001-fix.patch\"",
            ]
        );
    }

    #[test]
    fn test_patches_are_optional() {
        let commands = pin_commands(&source());
        assert!(commands[..4].iter().all(|c| c.must_succeed));
        assert!(!commands[4].must_succeed);
        assert!(
            commands
                .iter()
                .all(|c| c.working_dir.as_deref() == Some(source().checkout_dir.as_path()))
        );
    }

    #[test]
    fn test_branch_only() {
        let mut src = source();
        src.commit = None;
        src.patches.clear();
        assert_eq!(pin_commands(&src).len(), 2);
    }
}
