//! Operating system family and CMake generator selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Operating system family the pipeline is running on.
///
/// Produced once from the raw platform name by [`OsFamily::from_name`]; every
/// platform decision downstream matches on this enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOs,
    /// Any other platform. Keeps the raw name for error messages.
    Unsupported(String),
}

impl OsFamily {
    /// Normalize a raw platform name (`"Windows"`, `"Linux"`, `"Darwin"`, ...).
    ///
    /// Names are matched by prefix so values such as `"Windows_NT"` or
    /// `"Linux-6.1"` normalize to their family. Anything else is preserved
    /// verbatim in [`OsFamily::Unsupported`].
    pub fn from_name(name: &str) -> Self {
        if name.starts_with("Windows") {
            Self::Windows
        } else if name.starts_with("Linux") {
            Self::Linux
        } else if name.starts_with("Darwin") {
            Self::MacOs
        } else {
            Self::Unsupported(name.to_string())
        }
    }

    /// The raw platform name in the `Windows` / `Linux` / `Darwin` convention.
    pub fn name(&self) -> &str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::MacOs => "Darwin",
            Self::Unsupported(name) => name,
        }
    }

    pub const fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Shared library extension, without the leading dot.
    pub const fn shared_library_extension(&self) -> &'static str {
        match self {
            Self::Windows => "dll",
            Self::MacOs => "dylib",
            Self::Linux | Self::Unsupported(_) => "so",
        }
    }

    /// Static library extension, without the leading dot.
    pub const fn static_library_extension(&self) -> &'static str {
        match self {
            Self::Windows => "lib",
            Self::Linux | Self::MacOs | Self::Unsupported(_) => "a",
        }
    }

    /// Native path separator used when handing paths to shell commands.
    pub const fn path_separator(&self) -> char {
        if self.is_windows() { '\\' } else { '/' }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// CMake generator backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Generator {
    VisualStudio2017Win64,
    UnixMakefiles,
    Ninja,
}

impl Generator {
    /// Native generator for the OS family.
    ///
    /// There is no generic fallback: unsupported platforms are an error.
    pub fn for_os(os: &OsFamily) -> PipelineResult<Self> {
        match os {
            OsFamily::Windows => Ok(Self::VisualStudio2017Win64),
            OsFamily::Linux | OsFamily::MacOs => Ok(Self::UnixMakefiles),
            OsFamily::Unsupported(name) => Err(PipelineError::UnsupportedOs { name: name.clone() }),
        }
    }

    /// The token passed to `cmake -G`.
    pub const fn token(&self) -> &'static str {
        match self {
            Self::VisualStudio2017Win64 => "Visual Studio 15 2017 Win64",
            Self::UnixMakefiles => "Unix Makefiles",
            Self::Ninja => "Ninja",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_known_families() {
        assert_eq!(OsFamily::from_name("Windows"), OsFamily::Windows);
        assert_eq!(OsFamily::from_name("Linux"), OsFamily::Linux);
        assert_eq!(OsFamily::from_name("Darwin"), OsFamily::MacOs);
    }

    #[test]
    fn test_from_name_prefix_match() {
        assert_eq!(OsFamily::from_name("Windows_NT"), OsFamily::Windows);
        assert_eq!(OsFamily::from_name("Linux-6.1.0"), OsFamily::Linux);
    }

    #[test]
    fn test_from_name_preserves_unknown_verbatim() {
        let os = OsFamily::from_name("FreeBSD");
        assert_eq!(os, OsFamily::Unsupported("FreeBSD".to_string()));
        assert_eq!(os.name(), "FreeBSD");
        // Case matters: the platform convention is capitalized.
        assert!(matches!(OsFamily::from_name("linux"), OsFamily::Unsupported(_)));
    }

    #[test]
    fn test_generator_mapping() {
        assert_eq!(
            Generator::for_os(&OsFamily::Windows).unwrap().token(),
            "Visual Studio 15 2017 Win64"
        );
        assert_eq!(
            Generator::for_os(&OsFamily::Linux).unwrap(),
            Generator::UnixMakefiles
        );
        assert_eq!(
            Generator::for_os(&OsFamily::MacOs).unwrap(),
            Generator::UnixMakefiles
        );
    }

    #[test]
    fn test_generator_unsupported_os_is_fatal() {
        let err = Generator::for_os(&OsFamily::from_name("Haiku")).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedOs { ref name } if name == "Haiku"));
        assert_eq!(err.to_string(), "Unsupported OS: Haiku");
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_library_extensions() {
        assert_eq!(OsFamily::Windows.shared_library_extension(), "dll");
        assert_eq!(OsFamily::Linux.shared_library_extension(), "so");
        assert_eq!(OsFamily::MacOs.shared_library_extension(), "dylib");
        assert_eq!(OsFamily::Windows.static_library_extension(), "lib");
        assert_eq!(OsFamily::MacOs.static_library_extension(), "a");
    }
}
