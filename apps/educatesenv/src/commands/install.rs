//! Install command for the educatesenv CLI.
//!
//! ## Usage
//!
//! ```bash
//! educatesenv install 3.2.1              # Download 3.2.1
//! educatesenv install 3.2.1 --use        # Download and make it active
//! educatesenv install 3.2.1 --overwrite  # Download again even if present
//! ```

use anyhow::Result;
use clap::Args;

use super::AppContext;
use crate::toolchain::InstallOutcome;

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    /// Version to install, exactly as tagged on the release host (e.g. "3.2.1").
    pub version: String,

    /// Make the version active after installing it.
    #[clap(long = "use", action = clap::ArgAction::SetTrue)]
    pub activate: bool,

    /// Download again even if the version is already installed.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub overwrite: bool,
}

/// Executes the install command.
///
/// # Errors
///
/// Returns an error if:
/// - The platform has no published binary
/// - The version or its asset does not exist on the release host
/// - The download fails
/// - `--use` was given and the version cannot be activated
pub async fn execute(args: &InstallArgs, ctx: &AppContext) -> Result<()> {
    let outcome = ctx
        .manager()
        .install(&args.version, args.overwrite, args.activate)
        .await?;

    println!("{}", location_line(&outcome));
    if !outcome.activated() {
        println!(
            "Run 'educatesenv use {}' to make it the active version.",
            args.version
        );
    }
    Ok(())
}

/// Describes where the installed binary lives.
fn location_line(outcome: &InstallOutcome) -> String {
    match outcome {
        InstallOutcome::Installed {
            path,
            reinstalled: true,
            ..
        } => format!("Replaced binary at {}", path.display()),
        InstallOutcome::Installed { path, .. } => format!("Binary saved to {}", path.display()),
        InstallOutcome::AlreadyInstalled { path, .. } => {
            format!("Binary located at {}", path.display())
        }
    }
}
