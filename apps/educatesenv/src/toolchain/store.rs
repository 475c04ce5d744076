//! Artifact store for installed educates binaries.
//!
//! All filesystem state lives in one directory (by default
//! `~/.educatesenv/bin`):
//!
//! ```text
//! ~/.educatesenv/bin/
//!   educates-3.2.1          # Installed binary, one file per version
//!   educates-3.3.0
//!   educates -> educates-3.3.0   # Active pointer (symlink)
//! ```
//!
//! The active pointer is the single symlink named `educates`. It either
//! points at one of the versioned files in this directory (stored as a
//! relative link so the directory can be moved) or, in development mode, at
//! an absolute path outside of it.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::platform::BINARY_PREFIX;
use crate::errors::EnvError;

/// Unversioned command name of the active pointer.
pub const BINARY_NAME: &str = "educates";

/// How the active pointer should record its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Relative to the store directory, falling back to absolute.
    Relative,
    /// Always the absolute path of the source.
    Absolute,
}

/// Paths and symlink operations for the artifact directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// Directory holding the versioned binaries and the active pointer.
    pub bin: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `bin`.
    ///
    /// A relative directory is anchored at the working directory so that
    /// link targets and the managed-binary check agree on one base.
    #[must_use]
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        let bin = bin.into();
        let bin = std::path::absolute(&bin).unwrap_or(bin);
        Self { bin }
    }

    /// Returns the path of the installed binary for `version`.
    #[must_use = "returns the path without side effects"]
    pub fn binary_path(&self, version: &str) -> PathBuf {
        self.bin.join(format!("{BINARY_PREFIX}{version}"))
    }

    /// Returns the path of the active pointer symlink.
    #[must_use = "returns the path without side effects"]
    pub fn active_pointer_path(&self) -> PathBuf {
        self.bin.join(BINARY_NAME)
    }

    #[must_use = "returns installation status without side effects"]
    pub fn is_version_installed(&self, version: &str) -> bool {
        self.binary_path(version).exists()
    }

    /// Creates the artifact directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_directory(&self) -> Result<()> {
        std::fs::create_dir_all(&self.bin)
            .with_context(|| format!("Failed to create bin directory {}", self.bin.display()))
    }

    /// Reads where the active pointer currently leads.
    ///
    /// Relative link targets are resolved against the store directory and
    /// normalized lexically. Returns `None` when there is no pointer, or when
    /// the path is occupied by something that is not a symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if the symlink exists but cannot be read.
    pub fn active_target(&self) -> Result<Option<PathBuf>> {
        let link = self.active_pointer_path();
        match std::fs::symlink_metadata(&link) {
            Ok(meta) if meta.file_type().is_symlink() => {}
            Ok(_) => {
                tracing::debug!(path = %link.display(), "active pointer path is not a symlink");
                return Ok(None);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to inspect symlink {}", link.display()));
            }
        }

        let target = std::fs::read_link(&link)
            .with_context(|| format!("Failed to read symlink {}", link.display()))?;
        let resolved = if target.is_absolute() {
            target
        } else {
            self.bin.join(target)
        };
        Ok(Some(normalize_lexically(&resolved)))
    }

    /// Returns the version the active pointer designates, if it points at a
    /// versioned binary inside this store.
    ///
    /// # Errors
    ///
    /// Returns an error if the symlink exists but cannot be read.
    pub fn active_version(&self) -> Result<Option<String>> {
        Ok(self
            .active_target()?
            .and_then(|target| self.version_of(&target)))
    }

    /// Whether the active pointer currently designates `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the symlink exists but cannot be read.
    pub fn is_active(&self, version: &str) -> Result<bool> {
        let expected = normalize_lexically(&self.binary_path(version));
        Ok(self.active_target()?.as_deref() == Some(expected.as_path()))
    }

    /// Whether `target` is a versioned binary managed by this store.
    #[must_use]
    pub fn is_managed_target(&self, target: &Path) -> bool {
        self.version_of(target).is_some()
    }

    fn version_of(&self, target: &Path) -> Option<String> {
        let bin = normalize_lexically(&self.bin);
        if target.parent() != Some(bin.as_path()) {
            return None;
        }
        let name = target.file_name()?.to_str()?;
        name.strip_prefix(BINARY_PREFIX).map(str::to_string)
    }

    /// Points the active pointer at `source`.
    ///
    /// An existing symlink is replaced. Anything else at the pointer path is
    /// left untouched and reported as [`EnvError::ActivePointerConflict`].
    /// If the process dies between removing the old link and creating the
    /// new one, no pointer is left behind.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::SourceNotFound`] if `source` does not exist,
    /// [`EnvError::ActivePointerConflict`] if the pointer path holds a
    /// regular file or directory, or an I/O error from link creation.
    pub fn create_active_pointer(&self, source: &Path, style: LinkStyle) -> Result<()> {
        if !source.exists() {
            return Err(EnvError::SourceNotFound {
                path: source.to_path_buf(),
            }
            .into());
        }

        let link = self.active_pointer_path();
        match std::fs::symlink_metadata(&link) {
            Ok(meta) if meta.file_type().is_symlink() => {
                std::fs::remove_file(&link).with_context(|| {
                    format!("Failed to remove existing symlink {}", link.display())
                })?;
            }
            Ok(_) => return Err(EnvError::ActivePointerConflict { path: link }.into()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to inspect symlink {}", link.display()));
            }
        }

        let target = match style {
            LinkStyle::Relative => {
                relative_path(&self.bin, source).unwrap_or_else(|| source.to_path_buf())
            }
            LinkStyle::Absolute => source.to_path_buf(),
        };
        tracing::debug!(link = %link.display(), target = %target.display(), "creating active pointer");
        create_link(&target, &link)
    }

    /// Removes the active pointer if present, including dangling links.
    ///
    /// Returns whether a symlink was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the symlink cannot be removed.
    pub fn remove_active_pointer(&self) -> Result<bool> {
        let link = self.active_pointer_path();
        match std::fs::symlink_metadata(&link) {
            Ok(meta) if meta.file_type().is_symlink() => {
                std::fs::remove_file(&link)
                    .with_context(|| format!("Failed to remove symlink {}", link.display()))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Lists installed versions, newest first by plain string order.
    ///
    /// The order is lexicographic, so `1.10.0` sorts before `1.9.0`.
    /// A missing directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn installed_versions(&self) -> Result<Vec<String>> {
        if !self.bin.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.bin)
            .with_context(|| format!("Failed to read bin directory {}", self.bin.display()))?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| "Failed to read directory entry")?;
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && let Some(version) = name.strip_prefix(BINARY_PREFIX)
                && !version.is_empty()
            {
                versions.push(version.to_string());
            }
        }

        versions.sort_unstable_by(|a, b| b.cmp(a));
        Ok(versions)
    }

    /// Deletes the installed binary for `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub fn remove_binary(&self, version: &str) -> Result<()> {
        let path = self.binary_path(version);
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove binary {}", path.display()))
    }
}

/// Marks a downloaded binary as executable.
///
/// # Errors
///
/// Returns an error if the permissions cannot be changed.
pub fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).with_context(
            || format!("Failed to set executable permissions on {}", path.display()),
        )?;
    }

    #[cfg(not(unix))]
    {
        let _ = path;
    }

    Ok(())
}

/// Computes `target` relative to the directory `base`.
///
/// Both paths must be of the same kind (absolute or relative) and `base`
/// must not climb with `..` past its common prefix with `target`.
fn relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
    let base = normalize_lexically(base);
    let target = normalize_lexically(target);
    if base.is_absolute() != target.is_absolute() {
        return None;
    }

    let base_parts: Vec<Component<'_>> = base
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let target_parts: Vec<Component<'_>> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    if base_parts[common..]
        .iter()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(relative)
}

/// Removes `.` components and folds `..` into its parent without touching
/// the filesystem.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Creates a symbolic link at `link` that points to `target`.
fn create_link(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).with_context(|| {
            format!(
                "Failed to create symlink {} -> {}",
                link.display(),
                target.display()
            )
        })?;
    }

    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_file(target, link).with_context(|| {
            format!(
                "Failed to create symlink {} -> {}",
                link.display(),
                target.display()
            )
        })?;
    }

    Ok(())
}
