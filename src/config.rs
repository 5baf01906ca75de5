//! Application configuration management.
//!
//! The configuration holds the dataset base URL and the persisted search
//! query, stored at `~/.config/auditoire/config.json`. The query
//! round-trips the way the web version keeps `?q=` in the address bar:
//! written while a search is active, removed when it is cleared, restored
//! at startup.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "auditoire";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Dataset location when nothing is configured; matches a local
/// `python -m http.server` over the updater's output directory.
const DEFAULT_DATA_URL: &str = "http://localhost:8000/data";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub data_url: Option<String>,
    pub last_query: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Dataset base URL: environment first, then config, then the local
    /// default.
    pub fn data_url(&self) -> String {
        std::env::var("AUDITOIRE_DATA_URL")
            .ok()
            .or_else(|| self.data_url.clone())
            .unwrap_or_else(|| DEFAULT_DATA_URL.to_string())
    }
}
