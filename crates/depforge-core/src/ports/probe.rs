//! Environment probe port.

use crate::error::PipelineResult;
use crate::os::{Generator, OsFamily};

/// Side-effect-free queries about the host.
///
/// # Example
///
/// ```ignore
/// use depforge_core::ports::EnvironmentProbe;
///
/// fn describe(probe: &dyn EnvironmentProbe) {
///     let os = probe.os_family();
///     let generator = probe.build_generator()?;
///     println!("{os}: {generator} with {} jobs", probe.logical_cpu_count());
/// }
/// ```
pub trait EnvironmentProbe: Send + Sync {
    /// Raw OS name (`Windows`, `Linux`, `Darwin`, or anything else verbatim).
    fn os_name(&self) -> String;

    /// Number of schedulable hardware threads, at least 1.
    fn logical_cpu_count(&self) -> usize;

    /// Normalized OS family.
    fn os_family(&self) -> OsFamily {
        OsFamily::from_name(&self.os_name())
    }

    /// Native CMake generator for this host.
    fn build_generator(&self) -> PipelineResult<Generator> {
        Generator::for_os(&self.os_family())
    }
}
