//! Configuration for educatesenv.
//!
//! Values are resolved once per invocation, highest precedence first:
//!
//! 1. Environment variables (`EDUCATES_GITHUB_ORG`, `EDUCATES_LOCAL_DIR`, ...)
//! 2. `config.yaml` in the working directory, else `~/.educatesenv/config.yaml`
//! 3. Built-in defaults
//!
//! ## File Format
//!
//! ```yaml
//! github:
//!   org: educates
//!   repository: educates-training-platform
//!   token: ""
//! local:
//!   dir: /home/user/.educatesenv/bin
//! development:
//!   enabled: false
//!   binaryLocation: ""
//! ```
//!
//! Every section and field is optional in the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::EnvError;

/// Name of the directory under the home directory that holds all state.
pub const CONFIG_DIR_NAME: &str = ".educatesenv";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const DEFAULT_GITHUB_ORG: &str = "educates";
pub const DEFAULT_GITHUB_REPO: &str = "educates-training-platform";

const ENV_GITHUB_ORG: &str = "EDUCATES_GITHUB_ORG";
const ENV_GITHUB_REPOSITORY: &str = "EDUCATES_GITHUB_REPOSITORY";
const ENV_GITHUB_TOKEN: &str = "EDUCATES_GITHUB_TOKEN";
const ENV_LOCAL_DIR: &str = "EDUCATES_LOCAL_DIR";
const ENV_DEVELOPMENT_ENABLED: &str = "EDUCATES_DEVELOPMENT_ENABLED";
const ENV_DEVELOPMENT_BINARY_LOCATION: &str = "EDUCATES_DEVELOPMENT_BINARY_LOCATION";

/// Release host coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub org: String,
    pub repository: String,
    /// Access token; empty means anonymous requests.
    pub token: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            org: DEFAULT_GITHUB_ORG.to_string(),
            repository: DEFAULT_GITHUB_REPO.to_string(),
            token: String::new(),
        }
    }
}

/// Local artifact directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub dir: PathBuf,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            dir: default_bin_dir(&home_dir()),
        }
    }
}

/// Development mode settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopmentConfig {
    pub enabled: bool,
    /// Externally built binary; empty when unset.
    #[serde(rename = "binaryLocation")]
    pub binary_location: PathBuf,
}

/// Effective configuration for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub local: LocalConfig,
    pub development: DevelopmentConfig,
}

/// Where configuration is read from.
///
/// Holding the sources explicitly keeps loading free of process-global state.
pub struct ConfigSources<'a> {
    /// Home directory; the default artifact and config locations hang off it.
    pub home: PathBuf,
    /// Working directory, searched for `config.yaml` first.
    pub cwd: Option<PathBuf>,
    /// Environment lookup.
    pub env: Box<dyn Fn(&str) -> Option<String> + 'a>,
}

impl ConfigSources<'static> {
    /// Sources backed by the real process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            home: home_dir(),
            cwd: std::env::current_dir().ok(),
            env: Box::new(|name: &str| std::env::var(name).ok()),
        }
    }
}

impl Config {
    /// Built-in defaults relative to `home`.
    #[must_use]
    pub fn defaults(home: &Path) -> Self {
        Self {
            github: GithubConfig::default(),
            local: LocalConfig {
                dir: default_bin_dir(home),
            },
            development: DevelopmentConfig::default(),
        }
    }

    /// Loads the configuration from explicit sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed,
    /// or an environment override has an invalid value.
    pub fn load_from(sources: &ConfigSources<'_>) -> Result<Self> {
        let mut config = Self::defaults(&sources.home);

        if let Some(path) = find_config_file(sources) {
            tracing::debug!(path = %path.display(), "reading config file");
            config = read_file(&path, &config)?;
        }

        config.apply_env(sources.env.as_ref())?;
        Ok(config)
    }

    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = env(ENV_GITHUB_ORG) {
            self.github.org = value;
        }
        if let Some(value) = env(ENV_GITHUB_REPOSITORY) {
            self.github.repository = value;
        }
        if let Some(value) = env(ENV_GITHUB_TOKEN) {
            self.github.token = value;
        }
        if let Some(value) = env(ENV_LOCAL_DIR) {
            self.local.dir = PathBuf::from(value);
        }
        if let Some(value) = env(ENV_DEVELOPMENT_ENABLED) {
            self.development.enabled = parse_bool(ENV_DEVELOPMENT_ENABLED, &value)?;
        }
        if let Some(value) = env(ENV_DEVELOPMENT_BINARY_LOCATION) {
            self.development.binary_location = PathBuf::from(value);
        }
        Ok(())
    }

    /// Renders the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Whether a development binary location has been configured.
    #[must_use]
    pub fn has_development_binary(&self) -> bool {
        !self.development.binary_location.as_os_str().is_empty()
    }
}

/// Returns `~/.educatesenv` for the given home directory.
#[must_use]
pub fn config_dir(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR_NAME)
}

/// Returns `~/.educatesenv/config.yaml` for the given home directory.
#[must_use]
pub fn config_file_path(home: &Path) -> PathBuf {
    config_dir(home).join(CONFIG_FILE_NAME)
}

fn default_bin_dir(home: &Path) -> PathBuf {
    config_dir(home).join("bin")
}

/// Returns the user's home directory, or `.` when it cannot be determined.
#[must_use]
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| {
        eprintln!(
            "Warning: could not determine home directory, using current directory for bin folder."
        );
        PathBuf::from(".")
    })
}

/// Writes the default configuration file if none exists yet.
///
/// Returns the file path and whether it was created by this call.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_default_file(home: &Path) -> Result<(PathBuf, bool)> {
    let path = config_file_path(home);
    if path.exists() {
        return Ok((path, false));
    }

    let dir = config_dir(home);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory {}", dir.display()))?;

    let yaml = Config::defaults(home).to_yaml()?;
    std::fs::write(&path, yaml)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok((path, true))
}

/// Like [`write_default_file`], but an existing file is an error.
///
/// # Errors
///
/// Returns [`EnvError::ConfigExists`] if the file is already present, or an
/// I/O error if it cannot be written.
pub fn create_default_file(home: &Path) -> Result<PathBuf> {
    match write_default_file(home)? {
        (path, true) => Ok(path),
        (path, false) => Err(EnvError::ConfigExists { path }.into()),
    }
}

fn find_config_file(sources: &ConfigSources<'_>) -> Option<PathBuf> {
    sources
        .cwd
        .iter()
        .map(|cwd| cwd.join(CONFIG_FILE_NAME))
        .chain(std::iter::once(config_file_path(&sources.home)))
        .find(|path| path.is_file())
}

/// Reads a config file, filling fields it omits from `defaults`.
fn read_file(path: &Path, defaults: &Config) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(defaults.clone());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    let mut merged = serde_yaml::to_value(defaults).context("Failed to serialize defaults")?;
    merge_yaml(&mut merged, value);
    serde_yaml::from_value(merged)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Overlays `overlay` onto `base`, recursing into mappings.
fn merge_yaml(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, serde_yaml::Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(EnvError::InvalidEnvValue {
            name: name.to_string(),
            value: value.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_home_config(home: &Path, yaml: &str) {
        std::fs::create_dir_all(config_dir(home)).unwrap();
        std::fs::write(config_file_path(home), yaml).unwrap();
    }

    #[test]
    fn defaults_are_used_without_file_or_env() {
        let home = TempDir::new().unwrap();
        let sources = ConfigSources {
            home: home.path().to_path_buf(),
            cwd: None,
            env: Box::new(no_env),
        };

        let config = Config::load_from(&sources).unwrap();

        assert_eq!(config.github.org, "educates");
        assert_eq!(config.github.repository, "educates-training-platform");
        assert!(config.github.token.is_empty());
        assert_eq!(config.local.dir, home.path().join(".educatesenv").join("bin"));
        assert!(!config.development.enabled);
        assert!(!config.has_development_binary());
    }

    #[test]
    fn file_values_override_defaults() {
        let home = TempDir::new().unwrap();
        write_home_config(
            home.path(),
            "github:\n  org: testorg\n  repository: testrepo\n  token: testtoken\n\
             local:\n  dir: /test/dir\n\
             development:\n  enabled: true\n  binaryLocation: /test/binary\n",
        );
        let sources = ConfigSources {
            home: home.path().to_path_buf(),
            cwd: None,
            env: Box::new(no_env),
        };

        let config = Config::load_from(&sources).unwrap();

        assert_eq!(config.github.org, "testorg");
        assert_eq!(config.github.repository, "testrepo");
        assert_eq!(config.github.token, "testtoken");
        assert_eq!(config.local.dir, PathBuf::from("/test/dir"));
        assert!(config.development.enabled);
        assert_eq!(
            config.development.binary_location,
            PathBuf::from("/test/binary")
        );
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), "development:\n  enabled: true\n");
        let sources = ConfigSources {
            home: home.path().to_path_buf(),
            cwd: None,
            env: Box::new(no_env),
        };

        let config = Config::load_from(&sources).unwrap();

        assert!(config.development.enabled);
        assert_eq!(config.github.org, DEFAULT_GITHUB_ORG);
        assert_eq!(config.local.dir, home.path().join(".educatesenv/bin"));
    }

    #[test]
    fn working_directory_file_wins_over_home_file() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        write_home_config(home.path(), "github:\n  org: from-home\n");
        std::fs::write(cwd.path().join("config.yaml"), "github:\n  org: from-cwd\n").unwrap();
        let sources = ConfigSources {
            home: home.path().to_path_buf(),
            cwd: Some(cwd.path().to_path_buf()),
            env: Box::new(no_env),
        };

        let config = Config::load_from(&sources).unwrap();

        assert_eq!(config.github.org, "from-cwd");
    }

    #[test]
    fn environment_overrides_file() {
        let home = TempDir::new().unwrap();
        write_home_config(
            home.path(),
            "github:\n  org: fileorg\nlocal:\n  dir: /file/dir\n",
        );
        let vars: HashMap<&str, &str> = HashMap::from([
            ("EDUCATES_GITHUB_ORG", "envorg"),
            ("EDUCATES_GITHUB_REPOSITORY", "envrepo"),
            ("EDUCATES_GITHUB_TOKEN", "envtoken"),
            ("EDUCATES_LOCAL_DIR", "/env/dir"),
            ("EDUCATES_DEVELOPMENT_ENABLED", "true"),
            ("EDUCATES_DEVELOPMENT_BINARY_LOCATION", "/env/educates"),
        ]);
        let lookup = |name: &str| vars.get(name).map(|v| (*v).to_string());
        let sources = ConfigSources {
            home: home.path().to_path_buf(),
            cwd: None,
            env: Box::new(lookup),
        };

        let config = Config::load_from(&sources).unwrap();

        assert_eq!(config.github.org, "envorg");
        assert_eq!(config.github.repository, "envrepo");
        assert_eq!(config.github.token, "envtoken");
        assert_eq!(config.local.dir, PathBuf::from("/env/dir"));
        assert!(config.development.enabled);
        assert_eq!(
            config.development.binary_location,
            PathBuf::from("/env/educates")
        );
    }

    #[test]
    fn invalid_boolean_env_is_rejected() {
        let home = TempDir::new().unwrap();
        let lookup = |name: &str| (name == "EDUCATES_DEVELOPMENT_ENABLED").then(|| "maybe".to_string());
        let sources = ConfigSources {
            home: home.path().to_path_buf(),
            cwd: None,
            env: Box::new(lookup),
        };

        let err = Config::load_from(&sources).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<EnvError>(),
            Some(EnvError::InvalidEnvValue { .. })
        ));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), "github: [unclosed\n");
        let sources = ConfigSources {
            home: home.path().to_path_buf(),
            cwd: None,
            env: Box::new(no_env),
        };

        assert!(Config::load_from(&sources).is_err());
    }

    #[test]
    fn yaml_uses_camel_case_binary_location() {
        let yaml = Config::defaults(Path::new("/home/u")).to_yaml().unwrap();
        assert!(yaml.contains("binaryLocation"));
        assert!(yaml.contains("org: educates"));
        assert!(yaml.contains("/home/u/.educatesenv/bin"));
    }

    #[test]
    fn write_default_file_only_creates_once() {
        let home = TempDir::new().unwrap();

        let (path, created) = write_default_file(home.path()).unwrap();
        assert!(created);
        assert_eq!(path, home.path().join(".educatesenv/config.yaml"));

        let (_, created_again) = write_default_file(home.path()).unwrap();
        assert!(!created_again);
    }

    #[test]
    fn create_default_file_refuses_existing() {
        let home = TempDir::new().unwrap();
        create_default_file(home.path()).unwrap();

        let err = create_default_file(home.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EnvError>(),
            Some(EnvError::ConfigExists { .. })
        ));
    }

    #[test]
    fn written_defaults_round_trip_through_loader() {
        let home = TempDir::new().unwrap();
        write_default_file(home.path()).unwrap();
        let sources = ConfigSources {
            home: home.path().to_path_buf(),
            cwd: None,
            env: Box::new(no_env),
        };

        let config = Config::load_from(&sources).unwrap();

        assert_eq!(config, Config::defaults(home.path()));
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for value in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool("X", value).unwrap());
        }
        for value in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool("X", value).unwrap());
        }
    }
}
