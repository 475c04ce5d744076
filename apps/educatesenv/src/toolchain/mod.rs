//! Toolchain management for educatesenv.
//!
//! ## Module Structure
//!
//! - [`platform`] - OS and architecture to release asset name
//! - [`store`] - Artifact directory layout and the active pointer symlink
//! - [`github`] - Release lookups against the GitHub REST API
//! - [`download`] - HTTP download with progress output
//! - [`manager`] - Install, activation, removal and listing of versions

pub mod download;
pub mod github;
pub mod manager;
pub mod platform;
pub mod store;

pub use github::{GithubClient, ReleaseSource, ReleaseSummary};
pub use manager::{
    Activation, InstallOutcome, Reconciliation, UninstallOutcome, VersionManager, DEVELOP,
};
pub use platform::Platform;
