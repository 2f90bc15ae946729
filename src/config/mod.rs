//! # Configuration Management Module
//!
//! Centralized configuration for the realm item pipeline, with validation,
//! defaults, and TOML persistence.
//!
//! ## Configuration Structure
//!
//! - [`RealmConfig`] - Core realm settings (name, specialist cooldown, item
//!   seed path)
//! - [`LoggingConfig`] - Logging settings (consumed by the embedding binary)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tinyrealm::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Realm: {}", config.realm.name);
//!     println!("SP cooldown: {}s", config.realm.sp_cooldown_secs);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [realm]
//! name = "TinyRealm"
//! sp_cooldown_secs = 30
//! item_seed_path = "data/seeds/items.json"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub realm: RealmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmConfig {
    pub name: String,
    /// Seconds a character must wait after leaving a specialist
    /// transformation before wearing a specialist card again. Applied to
    /// newly created characters; balance data, not logic.
    pub sp_cooldown_secs: i64,
    /// Item template seed file loaded into the catalog at startup.
    #[serde(default)]
    pub item_seed_path: Option<String>,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            name: "TinyRealm".to_string(),
            sp_cooldown_secs: 30,
            item_seed_path: Some("data/seeds/items.json".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.realm.name.trim().is_empty() {
            return Err(anyhow!("realm.name must not be empty"));
        }
        if self.realm.sp_cooldown_secs < 0 {
            return Err(anyhow!(
                "realm.sp_cooldown_secs must be >= 0 (got {})",
                self.realm.sp_cooldown_secs
            ));
        }
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            other => Err(anyhow!("unknown logging.level '{}'", other)),
        }
    }
}
