//! List-remote command for the educatesenv CLI.
//!
//! Fetches releases from GitHub and prints their tags, newest first.
//!
//! ## Usage
//!
//! ```bash
//! educatesenv list-remote            # Stable releases only
//! educatesenv list-remote --all      # Include pre-releases
//! educatesenv list-remote --recents  # At most the 10 newest
//! ```

use anyhow::{Context, Result};
use clap::Args;

use super::AppContext;
use crate::toolchain::{ReleaseSource, ReleaseSummary};

/// Number of entries kept by `--recents`.
const RECENT_COUNT: usize = 10;

/// Arguments for the list-remote command.
#[derive(Args)]
pub struct ListRemoteArgs {
    /// Include pre-releases.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub all: bool,

    /// Show only the 10 most recent versions.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub recents: bool,
}

/// Executes the list-remote command.
///
/// # Errors
///
/// Returns an error if the release list cannot be fetched.
pub async fn execute(args: &ListRemoteArgs, ctx: &AppContext) -> Result<()> {
    let releases = ctx
        .client
        .list_releases()
        .await
        .context("failed to fetch releases")?;

    let versions = select_versions(&releases, args.all, args.recents);
    print!("{}", render(&versions));
    Ok(())
}

/// Filters and orders release tags for display.
///
/// Pre-releases are dropped unless `all` is set. Tags are sorted descending
/// by plain string order and cut to [`RECENT_COUNT`] when `recents` is set.
fn select_versions(releases: &[ReleaseSummary], all: bool, recents: bool) -> Vec<String> {
    let mut versions: Vec<String> = releases
        .iter()
        .filter(|release| all || !release.is_prerelease())
        .map(|release| release.tag.clone())
        .collect();

    versions.sort_unstable_by(|a, b| b.cmp(a));
    if recents {
        versions.truncate(RECENT_COUNT);
    }
    versions
}

fn render(versions: &[String]) -> String {
    let mut out = String::from("Available versions:\n");
    for version in versions {
        out.push_str(&format!("- {version}\n"));
    }
    if versions.is_empty() {
        out.push_str("No versions found\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(tag: &str, prerelease: bool) -> ReleaseSummary {
        ReleaseSummary {
            tag: tag.to_string(),
            prerelease,
        }
    }

    #[test]
    fn stable_listing_hides_flagged_and_named_prereleases() {
        let releases = vec![
            release("3.1.0", false),
            release("3.2.0-rc.1", false),
            release("3.2.0", true),
            release("3.0.0-Beta", false),
            release("2.9.0", false),
        ];

        assert_eq!(
            select_versions(&releases, false, false),
            vec!["3.1.0", "2.9.0"]
        );
    }

    #[test]
    fn all_listing_keeps_everything_sorted_descending() {
        let releases = vec![
            release("1.9.0", false),
            release("1.10.0", false),
            release("2.0.0-alpha.1", true),
        ];

        assert_eq!(
            select_versions(&releases, true, false),
            vec!["2.0.0-alpha.1", "1.9.0", "1.10.0"]
        );
    }

    #[test]
    fn recents_keeps_ten_newest() {
        let releases: Vec<ReleaseSummary> = (0..15)
            .map(|minor| release(&format!("3.{minor:02}.0"), false))
            .collect();

        let versions = select_versions(&releases, false, true);

        assert_eq!(versions.len(), 10);
        assert_eq!(versions.first().map(String::as_str), Some("3.14.0"));
        assert_eq!(versions.last().map(String::as_str), Some("3.05.0"));
    }

    #[test]
    fn render_reports_empty_result() {
        assert_eq!(render(&[]), "Available versions:\nNo versions found\n");
        assert_eq!(
            render(&["3.0.0".to_string()]),
            "Available versions:\n- 3.0.0\n"
        );
    }
}
