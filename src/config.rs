// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Persistent configuration stored as JSON in `~/.linecat/config.json`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{Archives, DEFAULT_CDMS_URL, DEFAULT_JPL_URL};

/// Default timeout for establishing HTTP connections (in seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// CDMS entries directory (listing page and catalog files).
    #[serde(default = "default_cdms_url")]
    pub cdms_url: String,
    /// JPL catalog directory (listing page and catalog files).
    #[serde(default = "default_jpl_url")]
    pub jpl_url: String,
    /// Where catalog files are saved. Defaults to the user's download folder.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_cdms_url() -> String {
    DEFAULT_CDMS_URL.to_string()
}

fn default_jpl_url() -> String {
    DEFAULT_JPL_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cdms_url: default_cdms_url(),
            jpl_url: default_jpl_url(),
            download_dir: None,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Config {
    /// Archive endpoints from the configured base URLs.
    pub fn archives(&self) -> Archives {
        Archives::new(&self.cdms_url, &self.jpl_url)
    }

    /// Configured download directory, or the platform download folder.
    pub fn destination_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// HTTP client shared by ingestion and downloads.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .user_agent(concat!("linecat/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")
    }
}

/// Get the config directory (~/.linecat), creating it if needed.
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let config_dir = home.join(".linecat");
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }
    Ok(config_dir)
}

/// Path of the config file.
pub fn config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Load the user config.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Save the user config.
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &config_path()?)
}

/// Load from `path`, falling back to defaults when the file does not exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Write `config` to `path` as pretty JSON.
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).with_context(|| format!("Failed to write config file: {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.archives(), Archives::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"download_dir": "/data/catalogs"}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.download_dir, Some(PathBuf::from("/data/catalogs")));
        assert_eq!(config.destination_dir(), PathBuf::from("/data/catalogs"));
        assert_eq!(config.cdms_url, DEFAULT_CDMS_URL);
        assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        let config = Config {
            jpl_url: "http://mirror.test/jpl".to_string(),
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.archives().jpl_listing_url(), "http://mirror.test/jpl/catdir.html");
    }

    #[test]
    fn test_invalid_json_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
