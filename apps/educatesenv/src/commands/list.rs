//! List command for the educatesenv CLI.
//!
//! Displays installed versions, newest first, marking the active one.
//! While development mode is enabled the development binary is listed too.

use anyhow::Result;

use super::AppContext;

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if the bin directory or the active pointer cannot be read.
pub fn execute(ctx: &AppContext) -> Result<()> {
    let listing = ctx.manager().list()?;
    print!("{}", listing.render());
    Ok(())
}
