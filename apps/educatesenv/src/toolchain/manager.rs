//! Version manager.
//!
//! Owns the transitions of the active selection (unset, a released version,
//! or the development binary) on top of an [`ArtifactStore`] and a
//! [`ReleaseSource`]. Commands build one manager per invocation and turn the
//! returned outcomes into user-facing output.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::github::ReleaseSource;
use super::platform::host_asset_name;
use super::store::{ArtifactStore, LinkStyle, normalize_lexically, set_executable};
use crate::config::Config;
use crate::errors::EnvError;

/// Pseudo-version that selects the development binary.
pub const DEVELOP: &str = "develop";

/// Result of [`VersionManager::install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The binary was already present and nothing was downloaded.
    AlreadyInstalled { path: PathBuf, activated: bool },
    /// The binary was downloaded (or replaced when `reinstalled`).
    Installed {
        path: PathBuf,
        reinstalled: bool,
        activated: bool,
    },
}

impl InstallOutcome {
    #[must_use]
    pub fn activated(&self) -> bool {
        match self {
            Self::AlreadyInstalled { activated, .. } | Self::Installed { activated, .. } => {
                *activated
            }
        }
    }
}

/// What the active pointer designates after [`VersionManager::use_version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Version { version: String, path: PathBuf },
    Development { path: PathBuf },
}

/// Result of [`VersionManager::validate_development_mode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    Unchanged,
    /// A pointer to a binary outside the store was removed.
    RemovedDevelopmentPointer { target: PathBuf },
}

/// Result of [`VersionManager::uninstall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    Removed,
    /// The removed version was active, so the pointer went with it.
    RemovedActive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedVersion {
    pub version: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevelopmentEntry {
    pub path: PathBuf,
    pub active: bool,
}

/// Snapshot of the local installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Installed versions, newest first by string order.
    pub versions: Vec<ListedVersion>,
    /// Present only while development mode is enabled.
    pub development: Option<DevelopmentEntry>,
}

impl Listing {
    /// Renders the listing the way `educatesenv list` prints it.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("Installed versions:\n");
        if let Some(dev) = &self.development {
            let marker = if dev.active { "* develop (active)" } else { "  develop" };
            out.push_str(&format!("{marker} -> {}\n", dev.path.display()));
        }
        for entry in &self.versions {
            if entry.active {
                out.push_str(&format!("* {} (active)\n", entry.version));
            } else {
                out.push_str(&format!("  {}\n", entry.version));
            }
        }
        if self.versions.is_empty() && self.development.is_none() {
            out.push_str("No versions installed\n");
        }
        out
    }
}

/// Install, activation and removal of educates versions.
pub struct VersionManager<'a, S> {
    config: &'a Config,
    source: &'a S,
    store: ArtifactStore,
}

impl<'a, S: ReleaseSource> VersionManager<'a, S> {
    #[must_use]
    pub fn new(config: &'a Config, source: &'a S) -> Self {
        Self {
            config,
            source,
            store: ArtifactStore::new(&config.local.dir),
        }
    }

    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Installs `version` into the store, optionally making it active.
    ///
    /// An existing binary is kept unless `force` is set, in which case it is
    /// downloaded again. Activation runs in both cases.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The version string is not usable as a file name
    /// - The platform has no published binary
    /// - The release or asset cannot be resolved
    /// - The download fails ([`EnvError::DownloadFailed`])
    /// - Activation fails after a successful install (context added, the
    ///   binary stays installed)
    pub async fn install(
        &self,
        version: &str,
        force: bool,
        activate: bool,
    ) -> Result<InstallOutcome> {
        validate_version(version)?;
        self.store.ensure_directory()?;

        let path = self.store.binary_path(version);
        let exists = self.store.is_version_installed(version);

        let mut outcome = if exists && !force {
            println!("Version {version} is already installed.");
            InstallOutcome::AlreadyInstalled {
                path,
                activated: false,
            }
        } else {
            if exists {
                println!("Reinstalling version {version}...");
            } else {
                println!("Installing version {version}...");
            }
            self.download(version, &path).await?;
            println!("educates {version} installed successfully.");
            InstallOutcome::Installed {
                path,
                reinstalled: exists,
                activated: false,
            }
        };

        if activate {
            self.use_version(version).with_context(|| {
                format!("installation succeeded but failed to set version {version} as active")
            })?;
            println!("educates {version} is now active.");
            match &mut outcome {
                InstallOutcome::AlreadyInstalled { activated, .. }
                | InstallOutcome::Installed { activated, .. } => *activated = true,
            }
        }

        Ok(outcome)
    }

    async fn download(&self, version: &str, path: &Path) -> Result<()> {
        let asset = host_asset_name()?;
        let url = self.source.asset_download_url(version, &asset).await?;

        println!("Downloading {url}...");
        tracing::debug!(%url, dest = %path.display(), "downloading release asset");
        self.source
            .download_asset(&url, path)
            .await
            .map_err(|e| EnvError::download_failed(&url, e))?;

        set_executable(path)
    }

    /// Points the active pointer at an installed version or, for `develop`,
    /// at the configured development binary.
    ///
    /// # Errors
    ///
    /// For `develop`: [`EnvError::DevelopmentDisabled`],
    /// [`EnvError::DevelopmentPathUnset`] or
    /// [`EnvError::DevelopmentBinaryMissing`]. Otherwise
    /// [`EnvError::VersionNotInstalled`]. Pointer creation can also fail with
    /// [`EnvError::ActivePointerConflict`].
    pub fn use_version(&self, version: &str) -> Result<Activation> {
        if version == DEVELOP {
            return self.use_development();
        }

        validate_version(version)?;
        let path = self.store.binary_path(version);
        if !self.store.is_version_installed(version) {
            return Err(EnvError::VersionNotInstalled {
                version: version.to_string(),
                path,
            }
            .into());
        }

        self.store.create_active_pointer(&path, LinkStyle::Relative)?;
        tracing::info!(version, "active version changed");
        Ok(Activation::Version {
            version: version.to_string(),
            path,
        })
    }

    fn use_development(&self) -> Result<Activation> {
        let development = &self.config.development;
        if !development.enabled {
            return Err(EnvError::DevelopmentDisabled.into());
        }
        if !self.config.has_development_binary() {
            return Err(EnvError::DevelopmentPathUnset.into());
        }

        let path = resolve_development_path(&development.binary_location)?;
        if !path.exists() {
            return Err(EnvError::DevelopmentBinaryMissing { path }.into());
        }

        self.store.ensure_directory()?;
        self.store.create_active_pointer(&path, LinkStyle::Absolute)?;
        tracing::info!(path = %path.display(), "development binary activated");
        Ok(Activation::Development { path })
    }

    /// Removes an active pointer to a foreign binary while development mode
    /// is disabled.
    ///
    /// A pointer counts as foreign when its target lies outside the store
    /// directory or lacks the versioned file name prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer cannot be read or removed.
    pub fn validate_development_mode(&self) -> Result<Reconciliation> {
        if self.config.development.enabled {
            return Ok(Reconciliation::Unchanged);
        }

        let Some(target) = self.store.active_target()? else {
            return Ok(Reconciliation::Unchanged);
        };
        if self.store.is_managed_target(&target) {
            return Ok(Reconciliation::Unchanged);
        }

        tracing::debug!(path = %target.display(), "removing development pointer");
        self.store
            .remove_active_pointer()
            .context("Failed to remove development symlink")?;
        Ok(Reconciliation::RemovedDevelopmentPointer { target })
    }

    /// Deletes an installed version, dropping the active pointer with it if
    /// the version was in use.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::VersionNotInstalled`] if the binary is absent, or
    /// an I/O error if removal fails.
    pub fn uninstall(&self, version: &str) -> Result<UninstallOutcome> {
        validate_version(version)?;
        let path = self.store.binary_path(version);
        if !self.store.is_version_installed(version) {
            return Err(EnvError::VersionNotInstalled {
                version: version.to_string(),
                path,
            }
            .into());
        }

        let in_use = self.store.is_active(version)?;
        self.store.remove_binary(version)?;

        if in_use {
            self.store.remove_active_pointer()?;
            Ok(UninstallOutcome::RemovedActive)
        } else {
            Ok(UninstallOutcome::Removed)
        }
    }

    /// Lists installed versions and marks the active one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store directory or pointer cannot be read.
    pub fn list(&self) -> Result<Listing> {
        let active = self.store.active_target()?;
        let active_version = self.store.active_version()?;

        let versions = self
            .store
            .installed_versions()?
            .into_iter()
            .map(|version| ListedVersion {
                active: active_version.as_deref() == Some(version.as_str()),
                version,
            })
            .collect();

        let development = self.config.development.enabled.then(|| {
            let path = self.config.development.binary_location.clone();
            let dev_active = self.config.has_development_binary()
                && active.is_some()
                && resolve_development_path(&path).ok() == active;
            DevelopmentEntry {
                path,
                active: dev_active,
            }
        });

        Ok(Listing {
            versions,
            development,
        })
    }
}

/// Rejects version strings that cannot safely name a file in the store.
///
/// # Errors
///
/// Returns [`EnvError::InvalidVersion`] for empty strings, path separators,
/// or `..`.
pub fn validate_version(version: &str) -> Result<()> {
    if version.is_empty()
        || version.contains('/')
        || version.contains('\\')
        || version.contains("..")
    {
        return Err(EnvError::InvalidVersion {
            version: version.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Anchors the development binary location at the working directory and
/// folds `.` and `..` components, giving the form the active pointer stores.
fn resolve_development_path(location: &Path) -> Result<PathBuf> {
    let path = std::path::absolute(location).with_context(|| {
        format!(
            "Failed to resolve development binary location {}",
            location.display()
        )
    })?;
    Ok(normalize_lexically(&path))
}
