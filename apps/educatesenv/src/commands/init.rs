//! Init command for the educatesenv CLI.
//!
//! Prepares a fresh machine: writes the default config file, creates the bin
//! directory and explains how to put it on `PATH`.
//!
//! ## Usage
//!
//! ```bash
//! educatesenv init                          # Config, folders and PATH hints
//! educatesenv init --download               # ...and install the latest release
//! educatesenv init --download --overwrite   # ...downloading it again if present
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use super::AppContext;
use crate::config::write_default_file;
use crate::toolchain::ReleaseSource;

/// Arguments for the `init` command.
#[derive(Args)]
pub struct InitArgs {
    /// Download the latest stable version and set it as active.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub download: bool,

    /// Force the download even if the version already exists.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub overwrite: bool,
}

/// Executes the `init` command.
///
/// # Errors
///
/// Returns an error if:
/// - The bin directory or config file cannot be created
/// - `--download` was given and resolving or installing the latest release fails
pub async fn execute(args: &InitArgs, ctx: &AppContext) -> Result<()> {
    let manager = ctx.manager();
    manager.store().ensure_directory()?;

    let (config_path, created) = write_default_file(&ctx.home)?;
    if created {
        println!("Config file created at {}", config_path.display());
    } else {
        println!("Config file already exists at {}", config_path.display());
    }
    let bin = &manager.store().bin;
    println!("Bin directory ensured at {}", bin.display());

    print_path_instructions(bin);

    if args.download {
        println!();
        println!("Fetching latest educates version...");
        let latest = ctx
            .client
            .latest_stable_version()
            .await
            .context("failed to get latest release version")?;
        println!("Latest version: {latest}");

        manager.install(&latest, args.overwrite, true).await?;
    } else {
        println!();
        println!("Run 'educatesenv install <version>' to install a specific version");
        println!("Run 'educatesenv list-remote' to see available versions");
    }

    Ok(())
}

fn print_path_instructions(bin: &Path) {
    println!();
    println!("To use educatesenv, add the bin directory to your PATH:");

    #[cfg(unix)]
    {
        println!();
        println!("For bash/zsh, run:");
        println!("  echo 'export PATH=\"{}:$PATH\"' >> ~/.bashrc", bin.display());
        println!("  source ~/.bashrc");
        println!();
        println!("For fish shell, run:");
        println!("  set -U fish_user_paths {} $fish_user_paths", bin.display());
    }

    #[cfg(windows)]
    {
        println!();
        println!("For Windows (PowerShell), run:");
        println!(
            "  [Environment]::SetEnvironmentVariable(\"Path\", \"{};\" + $Env:Path, [EnvironmentVariableTarget]::User)",
            bin.display()
        );
    }

    #[cfg(not(any(unix, windows)))]
    {
        println!();
        println!("Add {} to your PATH manually.", bin.display());
    }

    println!();
    println!("Restart your terminal or source your profile to apply the changes.");
}
