//! Command modules for the educatesenv CLI.
//!
//! ## Setup Commands
//!
//! - [`init`] - Create the config file and bin directory
//! - [`config_cmd`] - Generate or show the configuration
//!
//! ## Version Management Commands
//!
//! - [`install`] - Download a released version
//! - [`use_cmd`] - Select the active version
//! - [`list`] - List installed versions
//! - [`list_remote`] - List released versions
//! - [`uninstall`] - Remove an installed version
//! - [`version`] - Display educatesenv's own version

pub mod config_cmd;
pub mod init;
pub mod install;
pub mod list;
pub mod list_remote;
pub mod uninstall;
pub mod use_cmd;
pub mod version;

use std::path::PathBuf;

use crate::config::Config;
use crate::toolchain::{GithubClient, VersionManager};

/// Collaborators shared by every command of one invocation.
pub struct AppContext {
    pub home: PathBuf,
    pub config: Config,
    pub client: GithubClient,
}

impl AppContext {
    #[must_use]
    pub fn manager(&self) -> VersionManager<'_, GithubClient> {
        VersionManager::new(&self.config, &self.client)
    }
}
