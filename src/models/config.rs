//! Application configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default library file when --library is not given.
    pub library_path: PathBuf,
    /// Append-only log file for the reorganization log sink.
    pub log_file: PathBuf,
    /// Directory holding transient result records.
    pub transient_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let state = dirs_config_path();
        Self {
            library_path: PathBuf::from("library.json"),
            log_file: state.join("organizer.log"),
            transient_dir: state.join("transients"),
        }
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("uploads_organizer")
}

/// Load configuration from file.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    if config_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str(&content) {
                return config;
            }
        }
    }

    Config::default()
}
