use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};

fn dirs_home() -> Option<PathBuf> {
    env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| env::var("USERPROFILE").ok().map(PathBuf::from))
}

/// Get the config directory for gongmd
pub fn config_dir() -> Result<PathBuf> {
    let dir = if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("gongmd")
    } else if let Some(home) = dirs_home() {
        if cfg!(target_os = "macos") {
            home.join("Library").join("Application Support").join("gongmd")
        } else {
            // Linux (including WSL)
            home.join(".config").join("gongmd")
        }
    } else {
        bail!("Cannot determine config directory");
    };

    Ok(dir)
}

/// Default location of the TOML config file.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
