//! Configuration file loading.
//!
//! Settings come from `perft.toml` in the working directory unless another
//! path is given. Every field is optional; command-line flags override them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The file parsed but holds an unusable value.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Defaults for a perft run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PerftConfig {
    /// Depth searched when `--depth` is not given. Defaults to 5.
    #[serde(default = "default_depth")]
    pub default_depth: u32,
    /// Position used when `--fen` is not given. Defaults to the start position.
    #[serde(default)]
    pub default_fen: Option<String>,
    /// Print per-move counts for the final depth.
    #[serde(default)]
    pub divide: bool,
    /// Log filter used when `RUST_LOG` is unset. Defaults to "warn".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_depth() -> u32 {
    5
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for PerftConfig {
    fn default() -> Self {
        PerftConfig {
            default_depth: default_depth(),
            default_fen: None,
            divide: false,
            log_level: default_log_level(),
        }
    }
}

impl PerftConfig {
    /// Loads the configuration.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// [`Self::config_path()`] is tried and a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, or
    /// [`ConfigError::Invalid`] if `default_depth` is zero.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config_path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        if !required && !config_path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.clone(),
                source,
            })?;
        Self::parse(&content)
    }

    /// Parses configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: PerftConfig = toml::from_str(content)?;
        if config.default_depth == 0 {
            return Err(ConfigError::Invalid(
                "default_depth must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Returns the path to the configuration file.
    ///
    /// Currently returns `perft.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("perft.toml")
    }
}
