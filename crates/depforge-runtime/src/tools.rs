//! Build tool availability checks.

use std::process::Command;

use tracing::warn;

/// Result of probing one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: String,
    pub version: Option<String>,
}

impl ToolStatus {
    /// Run `<name> --version`; the tool counts as present when it exits
    /// cleanly, and its version is the first non-blank line of stdout, or of
    /// stderr for tools that report there.
    pub fn probe(name: &str) -> Self {
        let version = Command::new(name)
            .arg("--version")
            .output()
            .ok()
            .filter(|out| out.status.success())
            .and_then(|out| first_line(&out.stdout).or_else(|| first_line(&out.stderr)));

        Self {
            name: name.to_string(),
            version,
        }
    }

    pub const fn is_available(&self) -> bool {
        self.version.is_some()
    }
}

fn first_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

pub fn probe_tools(tools: &[&str]) -> Vec<ToolStatus> {
    tools.iter().map(|tool| ToolStatus::probe(tool)).collect()
}

/// Print the status of each tool and warn about missing ones.
///
/// Missing tools do not stop the pipeline; the command that needs the tool
/// will fail on its own.
pub fn check_tools(tools: &[&str]) -> Vec<ToolStatus> {
    println!("Checking build tools...");
    let statuses = probe_tools(tools);

    for status in &statuses {
        match &status.version {
            Some(version) => println!("✓ {} ({version})", status.name),
            None => println!("✗ {} not found", status.name),
        }
    }

    let missing: Vec<_> = statuses
        .iter()
        .filter(|s| !s.is_available())
        .map(|s| s.name.as_str())
        .collect();
    if !missing.is_empty() {
        warn!(missing = ?missing, "Build tools not found on PATH");
    }

    statuses
}
