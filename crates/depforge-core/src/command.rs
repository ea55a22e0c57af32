//! Shell command invocations.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single external command, built right before it is run.
///
/// The command line is handed to the platform shell verbatim, so callers are
/// responsible for quoting paths that may contain spaces (see [`quote`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command_line: String,
    /// When `false`, a non-zero exit is ignored.
    pub must_succeed: bool,
    /// Variables added on top of the inherited environment.
    pub environment: Option<BTreeMap<String, String>>,
    /// Directory to run in; the current directory when `None`.
    pub working_dir: Option<PathBuf>,
}

impl CommandInvocation {
    /// A mandatory command.
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            must_succeed: true,
            environment: None,
            working_dir: None,
        }
    }

    /// A command whose failure is tolerated.
    pub fn optional(command_line: impl Into<String>) -> Self {
        Self::new(command_line).must_succeed(false)
    }

    #[must_use]
    pub const fn must_succeed(mut self, must_succeed: bool) -> Self {
        self.must_succeed = must_succeed;
        self
    }

    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line)
    }
}

/// Wrap a path in double quotes for a shell command line.
pub fn quote(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_must_succeed() {
        let inv = CommandInvocation::new("git pull");
        assert!(inv.must_succeed);
        assert!(inv.environment.is_none());
        assert!(inv.working_dir.is_none());
    }

    #[test]
    fn test_optional_tolerates_failure() {
        let inv = CommandInvocation::optional("git am --signoff < fix.patch");
        assert!(!inv.must_succeed);
    }

    #[test]
    fn test_env_accumulates() {
        let inv = CommandInvocation::new("cmake ..")
            .env("CFLAGS", "-O2")
            .env("CXXFLAGS", "-O2");
        let env = inv.environment.unwrap();
        assert_eq!(env.len(), 2);
        assert_eq!(env["CFLAGS"], "-O2");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote(Path::new("/tmp/a b")), "\"/tmp/a b\"");
    }
}
