//! Application configuration management.
//!
//! Configuration is stored at `~/.config/dailyshelf/config.json`. Every field
//! is optional; `DAILYSHELF_CATALOG` and `DAILYSHELF_DATA_DIR` override the
//! file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::content::DEFAULT_MICROLEARNING_COUNT;

/// Application name used for config/data directory paths
const APP_NAME: &str = "dailyshelf";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const CATALOG_ENV: &str = "DAILYSHELF_CATALOG";
pub const DATA_DIR_ENV: &str = "DAILYSHELF_DATA_DIR";

fn default_microlearning_count() -> usize {
    DEFAULT_MICROLEARNING_COUNT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_microlearning_count")]
    pub microlearning_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            data_dir: None,
            microlearning_count: DEFAULT_MICROLEARNING_COUNT,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Self::from_json_str(&contents)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a config file body. A zero story count falls back to the default.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(contents)?;
        if config.microlearning_count == 0 {
            warn!(
                default = DEFAULT_MICROLEARNING_COUNT,
                "microlearning_count must be at least 1, using default"
            );
            config.microlearning_count = DEFAULT_MICROLEARNING_COUNT;
        }
        Ok(config)
    }

    /// Apply environment overrides on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = std::env::var_os(CATALOG_ENV) {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(path) = std::env::var_os(DATA_DIR_ENV) {
            self.data_dir = Some(PathBuf::from(path));
        }
        self
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted daily selections.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.microlearning_count, 10);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_zero_story_count_uses_default() {
        let config = Config::from_json_str(r#"{ "microlearning_count": 0 }"#).unwrap();
        assert_eq!(config.microlearning_count, DEFAULT_MICROLEARNING_COUNT);

        let config = Config::from_json_str(r#"{ "microlearning_count": 4 }"#).unwrap();
        assert_eq!(config.microlearning_count, 4);
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/dailyshelf-test")),
            ..Config::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/dailyshelf-test"));
    }
}
