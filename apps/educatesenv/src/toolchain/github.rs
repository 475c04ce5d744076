//! Release catalog access.
//!
//! [`ReleaseSource`] is the seam between the version manager and the remote
//! release host. [`GithubClient`] implements it against the GitHub REST API:
//!
//! - `GET /repos/{org}/{repo}/releases?per_page=N` for listings
//! - `GET /repos/{org}/{repo}/releases/tags/{tag}` for a single release
//!
//! The API base URL can be overridden with `EDUCATES_GITHUB_API_URL`, which
//! is mostly useful for mirrors and for tests.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::path::Path;

use super::download::{USER_AGENT, download_file};
use crate::config::GithubConfig;
use crate::errors::EnvError;

/// Environment variable to override the GitHub API base URL.
pub const API_URL_ENV: &str = "EDUCATES_GITHUB_API_URL";

const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size used when looking for the latest stable release.
const LATEST_PAGE_SIZE: u32 = 10;

/// Page size (and overall cap) for release listings.
const LIST_PAGE_SIZE: u32 = 100;

/// Tag fragments that mark a pre-release even when the host does not flag it.
const PRERELEASE_MARKERS: [&str; 6] = ["-alpha", "-beta", "-rc", ".alpha.", ".beta.", ".rc."];

/// Summary of a published release, used for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSummary {
    pub tag: String,
    /// The release host's own pre-release flag.
    pub prerelease: bool,
}

impl ReleaseSummary {
    /// Whether the release should be hidden from stable listings.
    ///
    /// True when the host flags it, or when the tag carries a pre-release
    /// marker such as `-rc` or `.beta.` (case-insensitive).
    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        self.prerelease || is_prerelease_tag(&self.tag)
    }
}

/// Checks whether a tag follows a pre-release naming convention.
#[must_use]
pub fn is_prerelease_tag(tag: &str) -> bool {
    let tag = tag.to_lowercase();
    PRERELEASE_MARKERS.iter().any(|marker| tag.contains(marker))
}

/// A remote catalog of released educates binaries.
#[allow(async_fn_in_trait)]
pub trait ReleaseSource {
    /// Returns the tag of the most recent release not flagged as pre-release.
    async fn latest_stable_version(&self) -> Result<String>;

    /// Resolves the download URL of `asset_name` in the release tagged `version`.
    async fn asset_download_url(&self, version: &str, asset_name: &str) -> Result<String>;

    /// Lists up to one page of releases in the host's order.
    async fn list_releases(&self) -> Result<Vec<ReleaseSummary>>;

    /// Fetches a resolved asset URL into `dest`.
    async fn download_asset(&self, url: &str, dest: &Path) -> Result<()> {
        download_file(url, dest).await
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Release {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Debug, Clone, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
}

/// GitHub-backed [`ReleaseSource`].
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    org: String,
    repo: String,
    token: Option<String>,
}

impl GithubClient {
    /// Creates a client for the configured organization and repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        let token = Some(config.token.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(Self {
            http,
            api_url: api_url(),
            org: config.org.clone(),
            repo: config.repository.clone(),
            token,
        })
    }

    fn repo_url(&self) -> String {
        format!("{}/repos/{}/{}", self.api_url, self.org, self.repo)
    }

    /// Builds the single-release URL with `tag` percent-encoded as one path
    /// segment, so `#`, `?` and `%` stay part of the tag.
    fn release_tag_url(&self, tag: &str) -> Result<reqwest::Url> {
        let base = self.repo_url();
        let mut url = reqwest::Url::parse(&base)
            .with_context(|| format!("Invalid GitHub API URL {base}"))?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("GitHub API URL {base} cannot carry a path"))?
            .pop_if_empty()
            .extend(["releases", "tags", tag]);
        Ok(url)
    }

    /// Performs a GET and returns the status with the body text.
    async fn get(&self, url: &str) -> Result<(reqwest::StatusCode, String)> {
        let mut request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%url, authenticated = self.token.is_some(), "querying release host");
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to fetch releases from {url}"))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {url}"))?;
        Ok((status, text))
    }

    async fn fetch_releases(&self, per_page: u32) -> Result<Vec<Release>> {
        let url = format!("{}/releases?per_page={per_page}", self.repo_url());
        let (status, text) = self.get(&url).await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnvError::RepositoryNotFound {
                org: self.org.clone(),
                repo: self.repo.clone(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(handle_http_error(status, &url).into());
        }

        serde_json::from_str(&text).with_context(|| format!("Failed to parse releases from {url}"))
    }
}

impl ReleaseSource for GithubClient {
    async fn latest_stable_version(&self) -> Result<String> {
        let releases = self.fetch_releases(LATEST_PAGE_SIZE).await?;
        select_latest_stable(&releases, &self.org, &self.repo)
    }

    async fn asset_download_url(&self, version: &str, asset_name: &str) -> Result<String> {
        let url = self.release_tag_url(version)?;
        let (status, text) = self.get(url.as_str()).await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnvError::VersionNotFound {
                version: version.to_string(),
            }
            .into());
        }
        if !status.is_success() {
            return Err(handle_http_error(status, url.as_str()).into());
        }

        let release: Release = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse release from {url}"))?;
        find_asset_url(&release, version, asset_name)
    }

    async fn list_releases(&self) -> Result<Vec<ReleaseSummary>> {
        let releases = self.fetch_releases(LIST_PAGE_SIZE).await?;
        Ok(releases
            .into_iter()
            .filter_map(|release| {
                release.tag_name.map(|tag| ReleaseSummary {
                    tag,
                    prerelease: release.prerelease,
                })
            })
            .collect())
    }
}

/// Returns the GitHub API base URL.
///
/// Checks `EDUCATES_GITHUB_API_URL` first. Empty or whitespace-only values
/// are treated as unset.
fn api_url() -> String {
    let url = std::env::var(API_URL_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    url.trim().trim_end_matches('/').to_string()
}

fn handle_http_error(status: reqwest::StatusCode, url: &str) -> EnvError {
    match status.as_u16() {
        403 | 429 => EnvError::release_host(format!(
            "request was refused ({status}): {url}. \
             You may be rate limited; set github.token in the config file"
        )),
        code if code >= 500 => EnvError::release_host(format!("server error ({code}): {url}")),
        code => EnvError::release_host(format!("HTTP error {code}: {url}")),
    }
}

/// Picks the first release, in host order, that is not flagged pre-release.
fn select_latest_stable(releases: &[Release], org: &str, repo: &str) -> Result<String> {
    if releases.is_empty() {
        return Err(EnvError::NoReleases {
            org: org.to_string(),
            repo: repo.to_string(),
        }
        .into());
    }

    releases
        .iter()
        .filter(|release| !release.prerelease)
        .find_map(|release| release.tag_name.clone())
        .ok_or_else(|| {
            EnvError::NoStableRelease {
                org: org.to_string(),
                repo: repo.to_string(),
            }
            .into()
        })
}

fn find_asset_url(release: &Release, version: &str, asset_name: &str) -> Result<String> {
    release
        .assets
        .iter()
        .find(|asset| asset.name == asset_name)
        .map(|asset| asset.browser_download_url.clone())
        .ok_or_else(|| {
            EnvError::AssetNotFound {
                version: version.to_string(),
                asset: asset_name.to_string(),
            }
            .into()
        })
}
