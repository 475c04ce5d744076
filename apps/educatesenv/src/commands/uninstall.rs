//! Uninstall command for the educatesenv CLI.
//!
//! ## Usage
//!
//! ```bash
//! educatesenv uninstall 3.2.1
//! ```

use anyhow::Result;
use clap::Args;

use super::AppContext;
use crate::toolchain::UninstallOutcome;

/// Arguments for the uninstall command.
#[derive(Args)]
pub struct UninstallArgs {
    /// Version to uninstall (e.g., "3.2.1").
    pub version: String,
}

/// Executes the uninstall command.
///
/// Removing the active version also removes the `educates` symlink.
///
/// # Errors
///
/// Returns an error if the version is not installed or cannot be removed.
pub fn execute(args: &UninstallArgs, ctx: &AppContext) -> Result<()> {
    let version = &args.version;
    match ctx.manager().uninstall(version)? {
        UninstallOutcome::RemovedActive => println!(
            "Uninstalled version {version}, which was the active version. \
             Please select a new version with 'educatesenv use <version>'."
        ),
        UninstallOutcome::Removed => println!("Uninstalled educates version {version}"),
    }
    Ok(())
}
