//! Use command for the educatesenv CLI.
//!
//! Points `<bin>/educates` at an installed version, or at the development
//! binary when given `develop`.

use anyhow::{Context, Result};
use clap::Args;

use super::AppContext;
use crate::toolchain::{Activation, DEVELOP};

/// Arguments for the use command.
#[derive(Args)]
pub struct UseArgs {
    /// Installed version to activate, or "develop".
    pub version: String,
}

/// Executes the use command.
///
/// # Errors
///
/// Returns an error if the version is not installed, development mode is
/// misconfigured, or the active pointer cannot be replaced.
pub fn execute(args: &UseArgs, ctx: &AppContext) -> Result<()> {
    let version = &args.version;
    let activation = ctx.manager().use_version(version).with_context(|| {
        if version == DEVELOP {
            "failed to switch to development version".to_string()
        } else {
            format!("failed to switch to version {version}")
        }
    })?;

    match activation {
        Activation::Version { version, path } => {
            println!("Now using educates version {version} ({})", path.display());
        }
        Activation::Development { path } => println!(
            "Now using educates development version from {}",
            path.display()
        ),
    }
    Ok(())
}
