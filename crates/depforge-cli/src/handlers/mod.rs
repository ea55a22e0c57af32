//! Command handlers.
//!
//! Handlers are thin: they turn parsed arguments into recipes or queries,
//! call into `depforge-runtime`, and format output for the terminal.

pub mod build;
pub mod probe;
