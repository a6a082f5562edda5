//! Credentials and endpoint configuration.
//!
//! Resolved per field, highest first: command line, environment, the TOML
//! file at `~/.config/gongmd/config.toml` (or `--config`), built-in defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::DEFAULT_BASE_URL;
use crate::platform::default_config_path;

pub const ACCESS_KEY_VAR: &str = "GONG_ACCESS_KEY";
pub const ACCESS_KEY_SECRET_VAR: &str = "GONG_ACCESS_KEY_SECRET";
pub const BASE_URL_VAR: &str = "GONG_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Gong credentials not found. Set GONG_ACCESS_KEY and GONG_ACCESS_KEY_SECRET, \
         or add access_key and access_key_secret to {}",
        .path.display()
    )]
    MissingCredentials { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot determine config path: {0}")]
    NoConfigPath(String),
}

/// What the config file may contain. Every key is optional.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct FileConfig {
    pub access_key: Option<String>,
    pub access_key_secret: Option<String>,
    pub base_url: Option<String>,
}

impl FileConfig {
    /// Load config from disk, returning default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("no config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved configuration.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub access_key: String,
    pub access_key_secret: String,
    pub base_url: String,
}

// Keep the secret out of debug logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_key", &self.access_key)
            .field("access_key_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Load from the process environment and the config file.
    pub fn load(cli_base_url: Option<&str>, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path().map_err(|e| ConfigError::NoConfigPath(e.to_string()))?,
        };
        let file = FileConfig::load(&path)?;
        Self::resolve(cli_base_url, |name| std::env::var(name).ok(), file, &path)
    }

    /// Merge the sources. Empty values count as unset.
    pub fn resolve(
        cli_base_url: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
        file: FileConfig,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        let pick = |env_name: &str, from_file: Option<String>| {
            env(env_name)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| from_file.filter(|v| !v.trim().is_empty()))
        };

        let access_key = pick(ACCESS_KEY_VAR, file.access_key);
        let access_key_secret = pick(ACCESS_KEY_SECRET_VAR, file.access_key_secret);
        let (Some(access_key), Some(access_key_secret)) = (access_key, access_key_secret) else {
            return Err(ConfigError::MissingCredentials {
                path: path.to_path_buf(),
            });
        };

        let base_url = cli_base_url
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .or_else(|| pick(BASE_URL_VAR, file.base_url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let config = Config {
            access_key,
            access_key_secret,
            base_url,
        };
        debug!("resolved config: {:?}", config);
        Ok(config)
    }
}
