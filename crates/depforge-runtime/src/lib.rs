//! Adapters and the dependency pipeline for depforge.
//!
//! This crate implements the ports declared in `depforge-core` against the
//! real host (shell, filesystem, network) and sequences them into the
//! fetch-build-stage [`Pipeline`].

#![deny(unused_crate_dependencies)]

pub mod cmake;
pub mod fetch;
pub mod fs;
pub mod pipeline;
mod probe;
mod process;
pub mod tools;

pub use fetch::HttpDownloader;
pub use fs::{find_and_copy, remove_tree};
pub use pipeline::{Pipeline, Stage};
pub use probe::HostProbe;
pub use process::ShellRunner;
