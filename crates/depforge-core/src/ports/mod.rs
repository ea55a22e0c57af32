//! Port definitions (traits) for side-effecting operations.
//!
//! Core owns the traits; `depforge-runtime` owns the implementations. The
//! pipeline only ever talks to these traits, which keeps it testable with
//! in-memory fakes.

mod download;
mod probe;
mod runner;

pub use download::ArchiveDownloader;
pub use probe::EnvironmentProbe;
pub use runner::CommandRunner;
