//! Best-effort recursive removal through the native shell.

use std::path::Path;

use depforge_core::{CommandInvocation, CommandRunner, OsFamily};
use tracing::debug;

/// Native removal command for `path` on `os`.
///
/// Separators are normalized to the platform convention and the path is
/// quoted. Errors are redirected away.
pub fn remove_command(os: &OsFamily, path: &Path) -> String {
    let raw = path.to_string_lossy();
    if os.is_windows() {
        let native = raw.replace('/', "\\");
        format!("rmdir \"{native}\" /s /q 2> NUL")
    } else {
        let native = raw.replace('\\', "/");
        format!("rm -rf \"{native}\" 2>/dev/null")
    }
}

/// Delete `path` and everything under it. Never fails; a missing path or a
/// failing native command is ignored.
pub fn remove_tree(runner: &dyn CommandRunner, os: &OsFamily, path: &Path) {
    let invocation = CommandInvocation::optional(remove_command(os, path));
    if let Err(e) = runner.execute(&invocation) {
        debug!(path = %path.display(), error = %e, "Removal failed, ignoring");
    }
}
