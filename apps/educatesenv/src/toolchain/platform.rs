//! Platform detection for educatesenv.
//!
//! Maps the local OS and architecture to the name of the release asset that
//! carries the matching `educates` binary.
//!
//! ## Supported Platforms
//!
//! - macOS `x86_64` (`educates-darwin-amd64`)
//! - macOS ARM64 (`educates-darwin-arm64`)
//! - Linux `x86_64` (`educates-linux-amd64`)
//! - Linux ARM64 (`educates-linux-arm64`)
//!
//! OS and architecture names follow the release host's naming (`darwin`,
//! `amd64`, ...) rather than Rust's (`macos`, `x86_64`, ...).

use anyhow::Result;
use std::fmt;

use crate::errors::EnvError;

/// Prefix shared by release asset names and installed binary file names.
pub const BINARY_PREFIX: &str = "educates-";

/// A supported OS/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    DarwinAmd64,
    DarwinArm64,
    LinuxAmd64,
    LinuxArm64,
}

impl Platform {
    /// Looks up a platform from release-host style OS and architecture names.
    #[must_use]
    pub fn from_parts(os: &str, arch: &str) -> Option<Self> {
        match (os, arch) {
            ("darwin", "amd64") => Some(Self::DarwinAmd64),
            ("darwin", "arm64") => Some(Self::DarwinArm64),
            ("linux", "amd64") => Some(Self::LinuxAmd64),
            ("linux", "arm64") => Some(Self::LinuxArm64),
            _ => None,
        }
    }

    /// Detects the platform this binary runs on.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::PlatformUnsupported`] when no release asset exists
    /// for the current OS/architecture combination.
    pub fn detect() -> Result<Self> {
        let (os, arch) = host_parts();
        Self::from_parts(os, arch).ok_or_else(|| {
            EnvError::PlatformUnsupported {
                os: os.to_string(),
                arch: arch.to_string(),
            }
            .into()
        })
    }

    #[must_use]
    pub fn os(self) -> &'static str {
        match self {
            Self::DarwinAmd64 | Self::DarwinArm64 => "darwin",
            Self::LinuxAmd64 | Self::LinuxArm64 => "linux",
        }
    }

    #[must_use]
    pub fn arch(self) -> &'static str {
        match self {
            Self::DarwinAmd64 | Self::LinuxAmd64 => "amd64",
            Self::DarwinArm64 | Self::LinuxArm64 => "arm64",
        }
    }

    /// Returns the release asset name for this platform, e.g. `educates-linux-amd64`.
    #[must_use = "returns the asset name without side effects"]
    pub fn asset_name(self) -> String {
        format!("{BINARY_PREFIX}{}-{}", self.os(), self.arch())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os(), self.arch())
    }
}

/// Resolves the release asset name for an OS/architecture pair.
///
/// # Errors
///
/// Returns [`EnvError::PlatformUnsupported`] for any pair outside
/// {darwin, linux} x {amd64, arm64}.
pub fn resolve_asset_name(os: &str, arch: &str) -> Result<String> {
    Platform::from_parts(os, arch)
        .map(Platform::asset_name)
        .ok_or_else(|| {
            EnvError::PlatformUnsupported {
                os: os.to_string(),
                arch: arch.to_string(),
            }
            .into()
        })
}

/// Resolves the release asset name for the host this binary runs on.
///
/// # Errors
///
/// Returns [`EnvError::PlatformUnsupported`] when no release asset exists
/// for the host.
pub fn host_asset_name() -> Result<String> {
    let (os, arch) = host_parts();
    resolve_asset_name(os, arch)
}

/// Translates Rust's target names into the release host's vocabulary.
fn host_parts() -> (&'static str, &'static str) {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => other,
    };
    (os, arch)
}
