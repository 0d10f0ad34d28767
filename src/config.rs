//! Configuration for hobbydeck.
//!
//! Values come from an optional TOML file at
//! `$XDG_CONFIG_HOME/hobbydeck/config.toml` (or `~/.config/...`), with
//! environment variables taking precedence:
//!
//! - `GOOGLE_API_KEY` / `GOOGLE_CSE_ID` — provider-A credentials (optional;
//!   discovery degrades to YouTube-only without them)
//! - `YOUTUBE_API_KEY` — provider-B credential (required for any search)
//! - `HOBBYDECK_PORT` — HTTP listen port (default 5870)
//! - `HOBBYDECK_DB` — SQLite database path (default
//!   `$XDG_DATA_HOME/hobbydeck/panels.db`)
//!
//! An empty or whitespace-only credential counts as missing.

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5870;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub discovery: DiscoveryConfig,
}

/// Credentials for the two discovery providers.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    pub youtube_api_key: Option<String>,
}

impl DiscoveryConfig {
    /// True when both provider-A credentials are present.
    pub fn google_configured(&self) -> bool {
        self.google_api_key.is_some() && self.google_cse_id.is_some()
    }
}

/// On-disk TOML shape; every field optional so a partial file is fine.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    port: Option<u16>,
    database_path: Option<PathBuf>,
    #[serde(default)]
    discovery: DiscoveryFile,
}

#[derive(Debug, Default, Deserialize)]
struct DiscoveryFile {
    google_api_key: Option<String>,
    google_cse_id: Option<String>,
    youtube_api_key: Option<String>,
}

impl Config {
    /// Load configuration: TOML file (if present) layered under env vars.
    pub fn load() -> Self {
        let file = read_config_file().unwrap_or_default();

        let port = env_nonempty("HOBBYDECK_PORT")
            .and_then(|v| v.parse().ok())
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let database_path = env_nonempty("HOBBYDECK_DB")
            .map(PathBuf::from)
            .or(file.database_path)
            .unwrap_or_else(default_database_path);

        let discovery = DiscoveryConfig {
            google_api_key: env_nonempty("GOOGLE_API_KEY")
                .or_else(|| valid_key(file.discovery.google_api_key.clone())),
            google_cse_id: env_nonempty("GOOGLE_CSE_ID")
                .or_else(|| valid_key(file.discovery.google_cse_id.clone())),
            youtube_api_key: env_nonempty("YOUTUBE_API_KEY")
                .or_else(|| valid_key(file.discovery.youtube_api_key.clone())),
        };

        Self {
            port,
            database_path,
            discovery,
        }
    }
}

fn read_config_file() -> Option<ConfigFile> {
    let path = config_file_path();
    let raw = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&raw) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
            None
        }
    }
}

fn config_file_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("hobbydeck")
        .join("config.toml")
}

fn default_database_path() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"))
        .join("hobbydeck")
        .join("panels.db")
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

/// Read an environment variable, treating empty/whitespace as unset.
fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(valid_key_str)
}

fn valid_key(value: Option<String>) -> Option<String> {
    value.and_then(valid_key_str)
}

fn valid_key_str(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
