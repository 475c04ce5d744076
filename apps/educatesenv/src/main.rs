#![warn(clippy::pedantic)]

//! # educatesenv
//!
//! Manages multiple versions of the `educates` binary side by side, in the
//! spirit of `tfenv`. Released binaries are downloaded from GitHub into a bin
//! directory, and a single `educates` symlink in that directory selects the
//! active one.
//!
//! ## Subcommands
//!
//! - `init` - Create config file and bin directory, show PATH instructions
//! - `config init` / `config view` - Generate or print the configuration
//! - `install` - Download a released version
//! - `use` - Select the active version (or `develop`)
//! - `list` - List installed versions
//! - `list-remote` - List released versions
//! - `uninstall` - Remove an installed version
//! - `version` - Display version information
//!
//! ## Examples
//!
//! ```bash
//! educatesenv init
//! educatesenv install 3.2.1 --use
//! educatesenv list
//! ```

mod commands;
mod config;
mod errors;
mod toolchain;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    AppContext, config_cmd, init, install, list, list_remote, uninstall, use_cmd, version,
};
use config::{Config, ConfigSources};
use toolchain::{GithubClient, Reconciliation};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "EDUCATESENV_LOG";

/// Manage multiple versions of the educates binary.
#[derive(Parser)]
#[command(
    name = "educatesenv",
    author,
    version,
    about = "Manage multiple versions of the educates binary",
    long_about = "A version manager for educates, inspired by tfenv.",
    after_help = "\
CONFIGURATION:
    ./config.yaml is read first, then ~/.educatesenv/config.yaml.

ENVIRONMENT VARIABLES:
    EDUCATES_GITHUB_ORG                    Release organization (default: educates)
    EDUCATES_GITHUB_REPOSITORY             Release repository (default: educates-training-platform)
    EDUCATES_GITHUB_TOKEN                  GitHub token for authenticated requests
    EDUCATES_LOCAL_DIR                     Bin directory (default: ~/.educatesenv/bin)
    EDUCATES_DEVELOPMENT_ENABLED           Enable development mode
    EDUCATES_DEVELOPMENT_BINARY_LOCATION   Development binary used by 'use develop'
    EDUCATESENV_LOG                        Log filter (default: warn)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize educatesenv.
    ///
    /// Creates the default config file and bin directory and shows how to
    /// add the bin directory to PATH.
    Init(init::InitArgs),

    /// Manage educatesenv configuration.
    Config(config_cmd::ConfigArgs),

    /// Install a specific educates version.
    Install(install::InstallArgs),

    /// Switch to a specific educates version.
    ///
    /// Use "develop" to select the development binary configured in
    /// development.binaryLocation.
    Use(use_cmd::UseArgs),

    /// List installed educates versions.
    #[command(alias = "list-local")]
    List,

    /// List available versions from GitHub releases.
    ListRemote(list_remote::ListRemoteArgs),

    /// Uninstall a specific educates version.
    Uninstall(uninstall::UninstallArgs),

    /// Display version information.
    Version(version::VersionArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        let exit_code = handle_error(&e);
        std::process::exit(exit_code);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_error(e: &anyhow::Error) -> i32 {
    eprintln!("Error: {e:?}");
    1
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let sources = ConfigSources::from_process();
    let config = Config::load_from(&sources)?;
    let client = GithubClient::new(&config.github)?;
    let ctx = AppContext {
        home: sources.home,
        config,
        client,
    };

    reconcile_development_mode(&ctx);

    match cli.command {
        Commands::Init(args) => init::execute(&args, &ctx).await,
        Commands::Config(args) => config_cmd::execute(&args, &ctx),
        Commands::Install(args) => install::execute(&args, &ctx).await,
        Commands::Use(args) => use_cmd::execute(&args, &ctx),
        Commands::List => list::execute(&ctx),
        Commands::ListRemote(args) => list_remote::execute(&args, &ctx).await,
        Commands::Uninstall(args) => uninstall::execute(&args, &ctx),
        Commands::Version(args) => version::execute(&args),
    }
}

/// Drops a stale development pointer before any command runs.
///
/// Never fails the invocation; problems are printed as warnings.
fn reconcile_development_mode(ctx: &AppContext) {
    match ctx.manager().validate_development_mode() {
        Ok(Reconciliation::Unchanged) => {}
        Ok(Reconciliation::RemovedDevelopmentPointer { target }) => {
            tracing::info!(path = %target.display(), "removed development pointer");
            println!(
                "Warning: development mode is disabled; removed symlink to development binary. \
                 Please use 'educatesenv use <version>' to select a version"
            );
        }
        Err(e) => println!("Warning: failed to validate development mode: {e:#}"),
    }
}
