//! core::config
//!
//! User-level configuration for CLI defaults.
//!
//! # Overview
//!
//! The configuration file carries defaults for flags the CLI would
//! otherwise require on every run. CLI flags always take precedence over
//! file values; a missing file simply means all defaults.
//!
//! # Locations
//!
//! Searched in order, first hit wins:
//! 1. `$SPECMETA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/specmeta/config.toml`
//! 3. `~/.specmeta/config.toml`
//!
//! # Schema
//!
//! ```toml
//! # JSON indent width for written metadata files (absent = compact)
//! indent = 2
//!
//! # Recurse into subdirectories when walking for .global files
//! recursive = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// The unreadable path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML for the schema.
    #[error("failed to parse config file '{path}': {message}")]
    Parse {
        /// The offending path
        path: PathBuf,
        /// Parser diagnostic
        message: String,
    },
}

/// User-level CLI defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON indent width for written metadata files; absent means compact.
    pub indent: Option<usize>,

    /// Whether directory walks recurse into subdirectories.
    pub recursive: Option<bool>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// A missing file is not an error; the default (empty) configuration is
    /// returned. An unreadable or unparsable file is.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Locate the first existing config file, if any.
    fn find_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var("SPECMETA_CONFIG") {
            if !explicit.is_empty() {
                return Some(PathBuf::from(explicit));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let candidate = config_dir.join("specmeta").join("config.toml");
            if candidate.exists() {
                return Some(candidate);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let candidate = home.join(".specmeta").join("config.toml");
            if candidate.exists() {
                return Some(candidate);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_schema_parses() {
        let file = write_temp("indent = 2\nrecursive = true\n");
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.indent, Some(2));
        assert_eq!(config.recursive, Some(true));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file = write_temp("");
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        let file = write_temp("indnet = 2\n");
        let result = Config::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_explicit_path_is_read_error() {
        let result = Config::load_from(Path::new("/no/such/config.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
