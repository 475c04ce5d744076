//! Build script for the educatesenv CLI.
//!
//! Embeds the short git commit hash so `educatesenv version -v` can report it.

use std::process::Command;

fn main() {
    let commit = get_git_commit();
    println!("cargo:rustc-env=EDUCATESENV_GIT_COMMIT={commit}");

    // Rerun if git HEAD changes (path relative to workspace root)
    if let Some(workspace_root) = get_workspace_root() {
        println!("cargo:rerun-if-changed={workspace_root}/.git/HEAD");
    }
}

fn get_workspace_root() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path.is_empty()).then_some(path)
}

/// Gets the short git commit hash, or `unknown` outside a checkout.
fn get_git_commit() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
