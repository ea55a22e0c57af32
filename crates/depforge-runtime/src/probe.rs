//! Host environment probe.

use depforge_core::EnvironmentProbe;

/// Map Rust's `std::env::consts::OS` value to the kernel name `uname -s`
/// reports (`Windows`, `Linux`, `Darwin`, `FreeBSD`, ...).
///
/// Values with no known kernel name pass through in Rust's lowercase form.
fn platform_name(os: &str) -> String {
    let name = match os {
        "windows" => "Windows",
        "linux" => "Linux",
        "macos" => "Darwin",
        "freebsd" => "FreeBSD",
        "netbsd" => "NetBSD",
        "openbsd" => "OpenBSD",
        "dragonfly" => "DragonFly",
        "solaris" | "illumos" => "SunOS",
        "haiku" => "Haiku",
        other => other,
    };
    name.to_string()
}

/// Probe backed by the running host.
///
/// # Example
///
/// ```ignore
/// use depforge_runtime::HostProbe;
/// use depforge_core::EnvironmentProbe;
///
/// let probe = HostProbe::new();
/// println!("{} ({} CPUs)", probe.os_name(), probe.logical_cpu_count());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct HostProbe;

impl HostProbe {
    pub const fn new() -> Self {
        Self
    }
}

impl EnvironmentProbe for HostProbe {
    fn os_name(&self) -> String {
        platform_name(std::env::consts::OS)
    }

    fn logical_cpu_count(&self) -> usize {
        num_cpus::get().max(1)
    }
}
