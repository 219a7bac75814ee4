//! # anylink-config
//!
//! Layered configuration loading for anylink using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ANYLINK_*` prefix, `__` as separator)
//! 2. Project-level `.anylink/config.toml`
//! 3. User-level `~/.config/anylink/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ANYLINK_DISCOVERY__PORT` -> `discovery.port`,
//! `ANYLINK_CLIENT__APP_NAME` -> `client.app_name`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use anylink_config::AnylinkConfig;
//!
//! let config = AnylinkConfig::load_with_dotenv().expect("config");
//! println!("looking for processes matching {}", config.discovery.process_filter);
//! ```

mod client;
mod discovery;
mod error;
mod search;
mod store;

pub use client::ClientConfig;
pub use discovery::DiscoveryConfig;
pub use error::ConfigError;
pub use search::SearchConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnylinkConfig {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl AnylinkConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".anylink/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("ANYLINK_").split("__"))
    }

    /// Reject values the rest of the workspace cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discovery.process_filter.trim().is_empty() {
            return Err(invalid("discovery.process_filter", "must not be empty"));
        }
        if self.discovery.host.trim().is_empty() {
            return Err(invalid("discovery.host", "must not be empty"));
        }
        if self.discovery.port == Some(0) {
            return Err(invalid("discovery.port", "must be between 1 and 65535"));
        }
        if self.client.app_name.trim().is_empty() {
            return Err(invalid("client.app_name", "must not be empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(invalid("client.timeout_secs", "must be at least 1"));
        }
        if self.store.env_file.trim().is_empty() {
            return Err(invalid("store.env_file", "must not be empty"));
        }
        if self.search.concurrency == 0 {
            return Err(invalid("search.concurrency", "must be at least 1"));
        }
        if self.search.retry_attempts == 0 {
            return Err(invalid("search.retry_attempts", "must be at least 1"));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("anylink").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
