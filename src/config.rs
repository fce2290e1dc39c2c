//! Configuration loading
//!
//! Reads `~/.config/quickopen/config.toml`. A missing file means defaults; a
//! broken file also means defaults, plus a warning for the status line.

use std::fs;
use std::path::{Path, PathBuf};

pub mod types;

pub use types::{Config, CoreConfig, QuickOpenConfig};

use crate::error::QuickOpenError;

const CONFIG_DIR: &str = "quickopen";
const CONFIG_FILE: &str = "config.toml";

/// Loaded configuration plus a warning to show if the file was unusable
#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn load_config() -> ConfigResult {
    match config_path() {
        Some(path) => load_config_from_path(&path),
        None => ConfigResult::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> ConfigResult {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ConfigResult::default(),
        Err(e) => {
            return ConfigResult {
                config: Config::default(),
                warning: Some(QuickOpenError::from(e).to_string()),
            };
        }
    };

    match parse_config(path, &contents) {
        Ok(mut config) => {
            let adjusted = config.quick_open.sanitize();
            let warning = (!adjusted.is_empty()).then(|| {
                QuickOpenError::Config {
                    path: path.to_path_buf(),
                    message: adjusted.join("; "),
                }
                .to_string()
            });
            if let Some(warning) = &warning {
                log::warn!("{}", warning);
            }
            ConfigResult { config, warning }
        }
        Err(e) => {
            log::warn!("{}", e);
            ConfigResult {
                config: Config::default(),
                warning: Some(e.to_string()),
            }
        }
    }
}

pub fn parse_config(path: &Path, contents: &str) -> Result<Config, QuickOpenError> {
    toml::from_str(contents).map_err(|e| QuickOpenError::Config {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
