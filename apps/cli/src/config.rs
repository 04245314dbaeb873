//! CLI configuration loading and merging.
//!
//! Configuration precedence:
//! 1. CLI arguments (handled by clap)
//! 2. Environment variables (`SKYROUTE_BASE_URL`, `SKYROUTE_CACHE_FILE`)
//! 3. Local config file (./.skyrouterc)
//! 4. Global config file (~/.skyroute/config.toml)
//! 5. Defaults

use serde::{Deserialize, Serialize};
use skyroute_client::{CacheConfig, ClientConfig, ProxyConfig};
use std::path::{Path, PathBuf};

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "SKYROUTE_BASE_URL";
/// Environment variable overriding the cache storage file.
pub const CACHE_FILE_ENV: &str = "SKYROUTE_CACHE_FILE";

/// CLI configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    /// Backend base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// File the lookup cache is persisted to
    #[serde(default)]
    pub cache_file: Option<PathBuf>,

    /// Maximum number of cached keywords
    #[serde(default)]
    pub max_cache_entries: Option<usize>,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        skyroute_dir().join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".skyrouterc")
    }

    /// Discover and load configuration files, then apply environment overrides.
    ///
    /// Unreadable or malformed files are skipped.
    pub fn discover_and_load() -> Self {
        let mut config = Self::default();

        // Local config overrides global config
        for path in [Self::default_global_path(), Self::default_local_path()] {
            if let Ok(file_config) = Self::load_from_file(&path) {
                config.merge(&file_config);
            }
        }

        config.apply_env();
        config
    }

    /// Merge another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &Self) {
        if let Some(ref base_url) = other.base_url {
            self.base_url = Some(base_url.clone());
        }
        if let Some(timeout_secs) = other.timeout_secs {
            self.timeout_secs = Some(timeout_secs);
        }
        if let Some(ref cache_file) = other.cache_file {
            self.cache_file = Some(cache_file.clone());
        }
        if let Some(max_cache_entries) = other.max_cache_entries {
            self.max_cache_entries = Some(max_cache_entries);
        }
        if let Some(ref log_level) = other.log_level {
            self.log_level = Some(log_level.clone());
        }
    }

    fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.is_empty() {
                self.base_url = Some(base_url);
            }
        }
        if let Ok(cache_file) = std::env::var(CACHE_FILE_ENV) {
            if !cache_file.is_empty() {
                self.cache_file = Some(PathBuf::from(cache_file));
            }
        }
    }

    /// The cache file, defaulting to ~/.skyroute/storage.json.
    pub fn cache_file(&self) -> PathBuf {
        self.cache_file.clone().unwrap_or_else(|| skyroute_dir().join("storage.json"))
    }

    /// Client configuration derived from these settings.
    pub fn client_config(&self) -> ClientConfig {
        let mut proxy = ProxyConfig::default();
        if let Some(ref base_url) = self.base_url {
            proxy.base_url = base_url.clone();
        }
        proxy.timeout_secs = self.timeout_secs;

        let mut cache = CacheConfig::default();
        if let Some(max_entries) = self.max_cache_entries {
            cache.max_entries = max_entries;
        }

        ClientConfig { proxy, cache }
    }
}

fn skyroute_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".skyroute")
}
