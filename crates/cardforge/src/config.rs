//! Configuration management for cardforge.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scancode::CodeOptions;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "cardforge";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "cardforge.db";

/// Largest accepted scan code edge in pixels.
pub const MAX_CODE_SIZE_PX: u32 = 4096;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CARDFORGE_`)
/// 2. TOML config file at `~/.config/cardforge/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Public card configuration.
    pub card: CardConfig,
    /// Scan code rendering configuration.
    pub code: CodeConfig,
    /// Cloud sync configuration.
    pub sync: SyncConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/cardforge/cardforge.db`
    pub database_path: Option<PathBuf>,
}

/// Public card configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Origin that public links are built under.
    pub base_url: String,
}

/// Scan code rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    /// Minimum image edge in pixels.
    pub size_px: u32,
    /// Keep the blank border around the code.
    pub quiet_zone: bool,
}

/// Cloud sync configuration. Sync is off unless enabled here and in the
/// profile, and both credentials are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Allow the profile's sync toggle to take effect.
    pub enabled: bool,
    /// Sync service endpoint.
    pub endpoint: Option<String>,
    /// Sync service key. Never serialized, so `config show --json` cannot
    /// leak it.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5173".to_string(),
        }
    }
}

impl Default for CodeConfig {
    fn default() -> Self {
        let options = CodeOptions::default();
        Self {
            size_px: options.size_px,
            quiet_zone: options.quiet_zone,
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading `config_path` instead of
    /// the default file when given.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CARDFORGE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let base = &self.card.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::ConfigValidation {
                message: format!("base_url must start with http:// or https://, got '{base}'"),
            });
        }

        if self.code.size_px == 0 || self.code.size_px > MAX_CODE_SIZE_PX {
            return Err(Error::ConfigValidation {
                message: format!(
                    "size_px must be between 1 and {MAX_CODE_SIZE_PX}, got {}",
                    self.code.size_px
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Scan code rendering options.
    #[must_use]
    pub fn code_options(&self) -> CodeOptions {
        CodeOptions {
            size_px: self.code.size_px,
            quiet_zone: self.code.quiet_zone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.card.base_url, "http://localhost:5173");
        assert_eq!(config.code.size_px, 256);
        assert!(config.code.quiet_zone);
        assert!(!config.sync.enabled);
        assert!(config.sync.endpoint.is_none());
        assert!(config.sync.api_key.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = Config::default();
        config.card.base_url = "localhost:5173".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("base_url"));
    }

    #[test]
    fn test_validate_zero_size() {
        let mut config = Config::default();
        config.code.size_px = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("size_px"));
    }

    #[test]
    fn test_validate_oversized_code() {
        let mut config = Config::default();
        config.code.size_px = MAX_CODE_SIZE_PX;
        assert!(config.validate().is_ok());

        config.code.size_px = u32::MAX;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("size_px"));
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let mut config = Config::default();
        config.sync.endpoint = Some("https://sync.example.test".to_string());
        config.sync.api_key = Some("very-secret-key".to_string());

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("sync.example.test"));
        assert!(!json.contains("very-secret-key"));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_api_key_still_loads_from_file() {
        let path = std::env::temp_dir().join(format!(
            "cardforge_config_key_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[sync]\nenabled = true\napi_key = \"k\"\n").unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.sync.api_key.as_deref(), Some("k"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("cardforge.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_code_options() {
        let mut config = Config::default();
        config.code.size_px = 512;
        config.code.quiet_zone = false;

        let options = config.code_options();
        assert_eq!(options.size_px, 512);
        assert!(!options.quiet_zone);
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.ends_with("cardforge/config.toml"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "cardforge_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[card]\nbase_url = \"https://cards.example.test\"\n\n[code]\nsize_px = 400\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.card.base_url, "https://cards.example.test");
        assert_eq!(config.code.size_px, 400);
        assert!(config.code.quiet_zone);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_from_invalid_file_fails_validation() {
        let path = std::env::temp_dir().join(format!(
            "cardforge_config_bad_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[card]\nbase_url = \"ftp://nope\"\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
