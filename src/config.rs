//! Token configuration file handling.
//!
//! The config file is a single JSON object with one recognized key,
//! `github_token`. Absence of the file or of the key means "no token
//! configured", not an error. The file is rewritten wholesale on every
//! token change. The loaded [`Config`] is passed explicitly into the
//! search client constructor; there is no ambient process-wide state.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File system error reading or writing the config file.
    #[error("IO error accessing config {path}: {source}")]
    Io {
        /// The config file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file exists but is not valid JSON.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// The config file path.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Process configuration: a single optional access token.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Access token for the repository search API, if configured.
    #[serde(default)]
    pub github_token: Option<String>,
}

impl Config {
    /// Loads configuration from `path`.
    ///
    /// A missing file yields the default (unconfigured) config. Unknown
    /// keys in the file are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the whole configuration to `path`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] on any file system failure.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let text = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, text).map_err(io_error)?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Returns true when a token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.github_token.is_some()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token_configured", &self.has_token())
            .finish()
    }
}

/// Default config file location: `$XDG_CONFIG_HOME/cve-toolkit/config.json`,
/// falling back to `~/.config/cve-toolkit/config.json`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let base = env::var_os("XDG_CONFIG_HOME").map_or_else(
        || {
            let home = env::var_os("HOME").unwrap_or_default();
            PathBuf::from(home).join(".config")
        },
        PathBuf::from,
    );
    base.join("cve-toolkit").join("config.json")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_means_unconfigured_not_error() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(&temp.path().join("config.json")).unwrap();
        assert!(!config.has_token());
    }

    #[test]
    fn test_missing_key_means_unconfigured() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();
        let config = Config::load(&path).unwrap();
        assert!(config.github_token.is_none());
    }

    #[test]
    fn test_save_then_load_round_trips_token() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");
        let config = Config {
            github_token: Some("ghp_token".to_string()),
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.github_token.as_deref(), Some("ghp_token"));
    }

    #[test]
    fn test_save_rewrites_wholesale_on_clear() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        Config {
            github_token: Some("old".to_string()),
        }
        .save(&path)
        .unwrap();
        Config::default().save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert!(loaded.github_token.is_none());
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{"github_token": "t", "legacy": true}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.github_token.as_deref(), Some("t"));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let config = Config {
            github_token: Some("ghp_secret".to_string()),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ghp_secret"), "{rendered}");
    }
}
