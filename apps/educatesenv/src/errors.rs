//! Error types for the educatesenv CLI.
//!
//! Operations return `anyhow::Result`; the failures a user can act on are
//! raised as [`EnvError`] so callers can `downcast_ref` them through any
//! context that was added on the way up.

use std::path::PathBuf;
use thiserror::Error;

/// Typed failures of the version manager and its collaborators.
#[derive(Debug, Error)]
pub enum EnvError {
    /// No release asset is published for this OS/architecture.
    #[error(
        "unsupported platform: {os}-{arch}. Supported platforms are: \
         darwin-amd64, darwin-arm64, linux-amd64, linux-arm64"
    )]
    PlatformUnsupported {
        /// Operating system name as reported by the release host convention.
        os: String,
        /// Architecture name as reported by the release host convention.
        arch: String,
    },

    /// The configured organization/repository does not exist.
    #[error("repository {org}/{repo} not found")]
    RepositoryNotFound { org: String, repo: String },

    /// The repository exists but has no releases at all.
    #[error("no releases found in {org}/{repo}")]
    NoReleases { org: String, repo: String },

    /// Every recent release is flagged as a pre-release.
    #[error(
        "no stable releases found in {org}/{repo}. \
         Try 'educatesenv list-remote --all' to see pre-releases"
    )]
    NoStableRelease { org: String, repo: String },

    /// No release is tagged with the requested version.
    #[error("version {version} not found. Run 'educatesenv list-remote' to see available versions")]
    VersionNotFound { version: String },

    /// The release exists but carries no binary for this platform.
    #[error(
        "binary for {version} is not available for your platform ({asset}). \
         Please check supported platforms in the documentation"
    )]
    AssetNotFound { version: String, asset: String },

    /// The release host answered with an unexpected status.
    #[error("release host error: {message}")]
    ReleaseHost { message: String },

    /// Streaming the binary to disk failed; re-running the command may help.
    #[error("failed to download {url} (check your internet connection and try again)")]
    DownloadFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The file an active pointer should reference does not exist.
    #[error("binary not found at {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// Something other than a symlink occupies the active pointer path.
    #[error(
        "{} exists and is not a symlink; move or delete it manually",
        path.display()
    )]
    ActivePointerConflict { path: PathBuf },

    /// The version has not been installed into the artifact directory.
    #[error(
        "version {version} is not installed (expected at {}). \
         Run 'educatesenv install {version}' first",
        path.display()
    )]
    VersionNotInstalled { version: String, path: PathBuf },

    /// The version string cannot be used as part of a file name.
    #[error("invalid version {version:?}")]
    InvalidVersion { version: String },

    /// `use develop` was requested while development mode is off.
    #[error(
        "development mode is not enabled. \
         Enable it in the config file by setting development.enabled to true"
    )]
    DevelopmentDisabled,

    /// Development mode is on but no binary location is configured.
    #[error(
        "development binary location is not set. \
         Set development.binaryLocation in the config file"
    )]
    DevelopmentPathUnset,

    /// The configured development binary does not exist.
    #[error("development binary not found at {}", path.display())]
    DevelopmentBinaryMissing { path: PathBuf },

    /// `config init` refuses to replace an existing file.
    #[error("config file already exists at {}", path.display())]
    ConfigExists { path: PathBuf },

    /// An environment override could not be interpreted.
    #[error("invalid value {value:?} for environment variable {name}")]
    InvalidEnvValue { name: String, value: String },
}

impl EnvError {
    /// Creates a new `DownloadFailed` error from any underlying failure.
    #[must_use]
    pub fn download_failed(url: impl Into<String>, source: anyhow::Error) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Creates a new `ReleaseHost` error.
    #[must_use]
    pub fn release_host(message: impl Into<String>) -> Self {
        Self::ReleaseHost {
            message: message.into(),
        }
    }
}
