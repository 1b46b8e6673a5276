//! Configuration resolution for vinylscan
//!
//! Two-tier resolution: environment variables over a TOML config file.
//! Credentials for all three external collaborators are required; none
//! may be hard-coded.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const DEFAULT_BIND: &str = "0.0.0.0:5001";
const DEFAULT_SHEET_TITLE: &str = "Sheet1";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file read failed: {0}")]
    Read(String),

    #[error("Config parse failed: {0}")]
    Parse(String),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {0}: {1}")]
    Invalid(&'static str, String),
}

/// On-disk TOML layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub ledger: LedgerSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSection {
    /// Discogs personal access token
    pub token: Option<String>,
    /// Override for tests or a self-hosted proxy
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSection {
    /// Firebase Realtime Database URL
    pub database_url: Option<String>,
    /// Database secret, appended as `?auth=`
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerSection {
    pub spreadsheet_id: Option<String>,
    pub sheet_title: Option<String>,
    /// Numeric sheet id (gid) used for row deletion
    pub sheet_id: Option<i64>,
    pub access_token: Option<String>,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub discogs_token: String,
    pub catalog_base_url: Option<String>,
    pub store_database_url: String,
    pub store_auth_token: Option<String>,
    pub spreadsheet_id: String,
    pub sheet_title: String,
    pub sheet_id: i64,
    pub sheets_access_token: String,
}

impl Config {
    /// Load from an optional TOML file, then apply environment
    /// overrides. Environment wins.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let toml_config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .map_err(|e| ConfigError::Read(format!("{}: {}", p.display(), e)))?;
                let config: TomlConfig =
                    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
                info!("Loaded config file: {}", p.display());
                config
            }
            None => TomlConfig::default(),
        };

        Self::resolve(toml_config)
    }

    fn resolve(toml_config: TomlConfig) -> Result<Config, ConfigError> {
        let sheet_id = match env_var("VINYLSCAN_SHEET_ID") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|e| ConfigError::Invalid("VINYLSCAN_SHEET_ID", e.to_string()))?,
            None => toml_config.ledger.sheet_id.unwrap_or(0),
        };

        Ok(Config {
            bind: env_var("VINYLSCAN_BIND")
                .or(toml_config.server.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            discogs_token: env_var("VINYLSCAN_DISCOGS_TOKEN")
                .or(toml_config.catalog.token)
                .ok_or(ConfigError::Missing(
                    "catalog.token (or VINYLSCAN_DISCOGS_TOKEN)",
                ))?,
            catalog_base_url: env_var("VINYLSCAN_CATALOG_BASE_URL")
                .or(toml_config.catalog.base_url),
            store_database_url: env_var("VINYLSCAN_STORE_DATABASE_URL")
                .or(toml_config.store.database_url)
                .ok_or(ConfigError::Missing(
                    "store.database_url (or VINYLSCAN_STORE_DATABASE_URL)",
                ))?,
            store_auth_token: env_var("VINYLSCAN_STORE_AUTH_TOKEN")
                .or(toml_config.store.auth_token),
            spreadsheet_id: env_var("VINYLSCAN_SPREADSHEET_ID")
                .or(toml_config.ledger.spreadsheet_id)
                .ok_or(ConfigError::Missing(
                    "ledger.spreadsheet_id (or VINYLSCAN_SPREADSHEET_ID)",
                ))?,
            sheet_title: env_var("VINYLSCAN_SHEET_TITLE")
                .or(toml_config.ledger.sheet_title)
                .unwrap_or_else(|| DEFAULT_SHEET_TITLE.to_string()),
            sheet_id,
            sheets_access_token: env_var("VINYLSCAN_SHEETS_ACCESS_TOKEN")
                .or(toml_config.ledger.access_token)
                .ok_or(ConfigError::Missing(
                    "ledger.access_token (or VINYLSCAN_SHEETS_ACCESS_TOKEN)",
                ))?,
        })
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
