//! Platform dynamic library formats and file name suffixes.

use std::path::Path;

/// Platform-specific library format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryFormat {
    /// Windows DLL.
    Dll,
    /// Linux/Unix shared object.
    So,
    /// macOS dynamic library.
    Dylib,
    /// Unknown format.
    Unknown,
}

impl LibraryFormat {
    /// Detect format from file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("dll") | Some("DLL") => Self::Dll,
            Some("so") => Self::So,
            Some("dylib") => Self::Dylib,
            _ => Self::Unknown,
        }
    }

    /// Look up the format used by a platform identifier.
    ///
    /// Accepts both the classic identifiers (`linux2`, `sunos`, `win32`,
    /// `darwin`) and Rust's `target_os` names.
    pub fn for_platform(os: &str) -> Self {
        match os {
            "linux" | "linux2" | "sunos" | "solaris" | "illumos" | "freebsd" | "openbsd"
            | "netbsd" | "dragonfly" | "android" => Self::So,
            "darwin" | "mac" | "macos" | "ios" => Self::Dylib,
            "win32" | "windows" => Self::Dll,
            _ => Self::Unknown,
        }
    }

    /// Get the format for the current platform.
    pub fn native() -> Self {
        Self::for_platform(std::env::consts::OS)
    }

    /// File name suffix including the leading dot.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Dll => Some(".dll"),
            Self::So => Some(".so"),
            Self::Dylib => Some(".dylib"),
            Self::Unknown => None,
        }
    }

    /// Append this format's suffix to `name` unless it already ends with it.
    ///
    /// Empty names are returned unchanged, as are names for `Unknown`.
    pub fn with_suffix(self, name: &str) -> String {
        match self.extension() {
            Some(ext) if !name.is_empty() && !name.ends_with(ext) => format!("{name}{ext}"),
            _ => name.to_string(),
        }
    }
}

/// Append the native library suffix to `name` if it is missing.
pub fn with_native_suffix(name: &str) -> String {
    LibraryFormat::native().with_suffix(name)
}
