//! config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$GITREMOTE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitremote/config.toml`
//! 3. `~/.gitremote/config.toml`
//!
//! Missing files are not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use gitremote::config::ClientConfig;
//!
//! let config = ClientConfig::load().unwrap();
//! println!("API base: {}", config.api_base());
//! ```

pub mod schema;

pub use schema::{ClientConfig, PullRequestDefaults};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GITREMOTE_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

impl ClientConfig {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|name| std::env::var(name).ok(), dirs::home_dir())
    }

    /// Load configuration using an explicit environment lookup and home
    /// directory.
    pub fn load_with(
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        match Self::locate(env, home) {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Read, parse, and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: ClientConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn locate(env: impl Fn(&str) -> Option<String>, home: Option<PathBuf>) -> Option<PathBuf> {
        // 1. $GITREMOTE_CONFIG
        if let Some(path) = env(CONFIG_ENV_VAR).map(PathBuf::from) {
            if path.exists() {
                return Some(path);
            }
        }

        // 2. $XDG_CONFIG_HOME/gitremote/config.toml
        if let Some(xdg_home) = env("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitremote/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ~/.gitremote/config.toml
        home.map(|h| h.join(".gitremote/config.toml"))
            .filter(|p| p.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn no_files_yields_defaults() {
        let home = TempDir::new().unwrap();
        let config = ClientConfig::load_with(|_| None, Some(home.path().to_path_buf())).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn explicit_env_path_wins() {
        let dir = TempDir::new().unwrap();
        let explicit = write(dir.path(), "explicit.toml", "user_agent = \"explicit\"");
        write(dir.path(), ".gitremote/config.toml", "user_agent = \"home\"");

        let explicit_str = explicit.to_string_lossy().to_string();
        let config = ClientConfig::load_with(
            |name| (name == CONFIG_ENV_VAR).then(|| explicit_str.clone()),
            Some(dir.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(config.user_agent(), "explicit");
    }

    #[test]
    fn xdg_before_home() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "xdg/gitremote/config.toml", "user_agent = \"xdg\"");
        write(dir.path(), ".gitremote/config.toml", "user_agent = \"home\"");

        let xdg = dir.path().join("xdg").to_string_lossy().to_string();
        let config = ClientConfig::load_with(
            |name| (name == "XDG_CONFIG_HOME").then(|| xdg.clone()),
            Some(dir.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(config.user_agent(), "xdg");
    }

    #[test]
    fn home_fallback() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".gitremote/config.toml", "timeout_secs = 5");
        let config = ClientConfig::load_with(|_| None, Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.timeout().as_secs(), 5);
    }

    #[test]
    fn parse_error_carries_path() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "bad.toml", "api_base = [");
        let err = ClientConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn invalid_value_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "c.toml", "timeout_secs = 0");
        assert!(matches!(
            ClientConfig::from_path(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
