//! Client configuration: proxy endpoint and lookup cache settings.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::cache::{CacheConfig, CacheConfigError};

/// Default base URL of the reservation backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration for the remote proxy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Base URL the `/api/amadeus/*` paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional request timeout in seconds. Unset means requests never time out.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_secs: None }
    }
}

impl ProxyConfig {
    /// Create a configuration for `base_url` with no timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout_secs: None }
    }

    /// Validate the proxy configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for an empty or non-HTTP base URL
    /// or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::InvalidValue("base_url must not be empty".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(format!(
                "base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The request timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Full client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Remote proxy settings.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Lookup cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// Invalid cache configuration.
    #[error(transparent)]
    Cache(#[from] CacheConfigError),
}

impl ClientConfig {
    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError(msg) => {
                ConfigError::ParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Validate both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.proxy.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.proxy.base_url, "http://localhost:3000");
        assert!(config.proxy.timeout().is_none());
        assert_eq!(config.cache.max_entries, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_str() {
        let config = ClientConfig::from_toml_str(
            r#"
            [proxy]
            base_url = "https://booking.example.com"
            timeout_secs = 15

            [cache]
            max_entries = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy.base_url, "https://booking.example.com");
        assert_eq!(config.proxy.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.cache.max_entries, 20);
        assert_eq!(config.cache.storage_key, "iata_lookup_cache_v1");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ClientConfig::from_toml_str("[proxy]\nbase_url = \"ftp://nope\"");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_invalid_cache_section() {
        let result = ClientConfig::from_toml_str("[cache]\nmax_entries = 0");
        assert!(matches!(result, Err(ConfigError::Cache(CacheConfigError::InvalidMaxEntries))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("skyroute.toml");

        assert!(matches!(ClientConfig::load_from_file(&path), Err(ConfigError::NotFound(_))));

        std::fs::write(&path, "[proxy]\nbase_url = \"http://127.0.0.1:8080\"").unwrap();
        let config = ClientConfig::load_from_file(&path).unwrap();
        assert_eq!(config.proxy.base_url, "http://127.0.0.1:8080");

        std::fs::write(&path, "[proxy\n").unwrap();
        assert!(matches!(ClientConfig::load_from_file(&path), Err(ConfigError::ParseError(_))));
    }
}
