/// Application configuration
///
/// Settings are read from a JSON file in the user's config directory:
/// - Linux: ~/.config/namaz-vakitleri/config.json
/// - macOS: ~/Library/Application Support/namaz-vakitleri/config.json
/// - Windows: %APPDATA%\namaz-vakitleri\config.json
///
/// Every field is optional; missing ones take their default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://prayertimes.api.abdus.dev/api/diyanet";

/// Environment variable that overrides `api_base_url`
pub const API_BASE_URL_ENV: &str = "NAMAZ_API_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Root of the prayer times API (no trailing endpoint)
    pub api_base_url: String,
    /// Retries after a transport failure before falling back
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Freshness window for city/district searches
    pub location_fresh_for_secs: u64,
    /// Freshness window for prayer times
    pub prayer_times_fresh_for_secs: u64,
    /// City searched on start-up before the user picks one
    pub default_city: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_retries: 2,
            retry_delay_ms: 500,
            request_timeout_secs: 10,
            location_fresh_for_secs: 60 * 60,
            prayer_times_fresh_for_secs: 30 * 60,
            default_city: "Istanbul".to_string(),
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            config.apply_base_url_override(&url);
        }

        Ok(config)
    }

    /// Get the path where the config file is expected
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("namaz-vakitleri");
        path.push("config.json");
        Some(path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Blank values are ignored
    fn apply_base_url_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.api_base_url = url.to_string();
        }
    }
}
