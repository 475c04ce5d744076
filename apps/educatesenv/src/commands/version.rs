//! Version command for the educatesenv CLI.
//!
//! Displays the version of educatesenv itself (not of the managed educates
//! binary). Verbose mode adds the build commit and platform.

use anyhow::Result;
use clap::Args;

use crate::toolchain::Platform;

/// Arguments for the version command.
#[derive(Args)]
pub struct VersionArgs {
    /// Show the build commit and platform as well.
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::SetTrue)]
    pub verbose: bool,
}

/// Executes the version command.
#[allow(clippy::unnecessary_wraps)]
pub fn execute(args: &VersionArgs) -> Result<()> {
    if args.verbose {
        print_verbose_version();
    } else {
        println!("educatesenv {}", env!("CARGO_PKG_VERSION"));
    }
    Ok(())
}

fn print_verbose_version() {
    println!("educatesenv {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build Information:");
    println!("  Version:  {}", env!("CARGO_PKG_VERSION"));
    println!("  Commit:   {}", git_commit());
    println!("  Platform: {}", platform_string());
}

/// Returns the git commit recorded by the build script, or a fallback.
fn git_commit() -> &'static str {
    option_env!("EDUCATESENV_GIT_COMMIT").unwrap_or("unknown")
}

/// Returns the release platform, or the raw host names when unsupported.
fn platform_string() -> String {
    Platform::detect().map_or_else(
        |_| {
            format!(
                "{}-{} (unsupported)",
                std::env::consts::OS,
                std::env::consts::ARCH
            )
        },
        |platform| platform.to_string(),
    )
}
