use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Settings for a [`crate::DocumentStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing fields fall back to the defaults below
pub struct StoreConfig {
    /// Maximum number of history snapshots (0 = unlimited)
    pub max_history: usize,
    /// Name of the site a fresh store starts with
    pub default_site_name: String,
    /// Name of the landing page every new site gets
    pub default_page_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_history: 100,
            default_site_name: "My Site".to_string(),
            default_page_name: "Home".to_string(),
        }
    }
}

/// Settings for [`crate::state::ProjectPersistence`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Directory where project files are stored
    pub state_dir: String,
    /// Maximum number of auto-save files to keep
    pub max_autosaves: usize,
    /// Interval between auto-saves in seconds
    pub autosave_interval_secs: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            state_dir: "projects".to_string(),
            max_autosaves: 5,
            autosave_interval_secs: 300, // 5 minutes
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub persistence: PersistenceConfig,
}

impl Config {
    /// Read a JSON config file. Absent keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::from_json(r#"{ "store": { "max_history": 10 } }"#)
            .unwrap();
        assert_eq!(config.store.max_history, 10);
        assert_eq!(config.store.default_page_name, "Home");
        assert_eq!(config.persistence, PersistenceConfig::default());
    }

    #[test]
    fn bad_json_is_reported() {
        assert!(matches!(
            Config::from_json("{ nope"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
