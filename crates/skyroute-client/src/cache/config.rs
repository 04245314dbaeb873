//! Configuration for the lookup cache.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of keywords kept in the cache.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Default storage key the cache is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "iata_lookup_cache_v1";

/// Configuration for the lookup cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of keywords to keep (default: 50).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Key the cache blob is stored under in the key-value store.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Errors that can occur during cache configuration validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheConfigError {
    /// Invalid max entries (must be > 0).
    #[error("Invalid max cache entries: must be greater than 0")]
    InvalidMaxEntries,

    /// Empty storage key.
    #[error("Invalid storage key: must not be empty")]
    EmptyStorageKey,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: default_max_entries(), storage_key: default_storage_key() }
    }
}

impl CacheConfig {
    /// Validate the cache configuration.
    ///
    /// # Errors
    /// Returns `CacheConfigError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), CacheConfigError> {
        if self.max_entries == 0 {
            return Err(CacheConfigError::InvalidMaxEntries);
        }

        if self.storage_key.trim().is_empty() {
            return Err(CacheConfigError::EmptyStorageKey);
        }

        Ok(())
    }
}
