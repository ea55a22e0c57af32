//! Source acquisition: git checkouts and release archives.

mod download;
mod extract;
mod git;

pub use download::HttpDownloader;
pub use extract::{extract, native_command};
pub use git::{clone_if_missing, pin, pin_commands};
