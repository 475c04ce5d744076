//! Config command for the educatesenv CLI.
//!
//! ## Usage
//!
//! ```bash
//! educatesenv config init   # Write ~/.educatesenv/config.yaml with defaults
//! educatesenv config view   # Print the effective configuration
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};

use super::AppContext;
use crate::config::create_default_file;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Generate a default config file.
    Init,

    /// Show the current configuration, including environment overrides.
    View,
}

/// Executes the config command.
///
/// # Errors
///
/// `config init` fails if the file already exists or cannot be written;
/// `config view` fails only if serialization fails.
pub fn execute(args: &ConfigArgs, ctx: &AppContext) -> Result<()> {
    match args.command {
        ConfigCommand::Init => {
            let path = create_default_file(&ctx.home)?;
            println!("Config file created at {}", path.display());
        }
        ConfigCommand::View => {
            println!("Current configuration:");
            println!("{}", ctx.config.to_yaml()?);
        }
    }
    Ok(())
}
