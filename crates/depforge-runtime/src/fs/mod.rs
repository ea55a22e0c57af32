//! Filesystem staging helpers.

mod locate;
mod remove;

pub use locate::{Found, copy_dir_recursive, find, find_and_copy};
pub use remove::{remove_command, remove_tree};
