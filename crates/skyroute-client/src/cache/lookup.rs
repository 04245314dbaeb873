//! LookupCache implementation with keyword normalization and bounded eviction.

use chrono::Utc;
use skyroute_abstraction::{KeyValueStore, Location};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::{CacheConfig, CacheConfigError};
use super::types::{CacheEntry, CacheStats, CacheStore};

/// Persisted, bounded cache of keyword search results.
///
/// The store is read from the key-value port on every operation and written
/// back after every successful mutation. Storage failures never reach the
/// caller: reads degrade to an empty store and writes become no-ops.
#[derive(Clone)]
pub struct LookupCache {
    /// Backing key-value store.
    store: Arc<dyn KeyValueStore>,
    /// Cache configuration.
    config: CacheConfig,
}

impl LookupCache {
    /// Create a new lookup cache over `store`.
    ///
    /// # Errors
    /// Returns `CacheConfigError` if the configuration is invalid.
    pub fn new(store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Result<Self, CacheConfigError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Create a lookup cache with the default configuration.
    #[must_use]
    pub fn with_defaults(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, config: CacheConfig::default() }
    }

    /// Normalize a keyword into a cache key.
    pub fn normalize_key(keyword: &str) -> String {
        keyword.to_lowercase()
    }

    /// Load the persisted store.
    ///
    /// Missing, malformed or unreadable data yields an empty store.
    pub fn read(&self) -> CacheStore {
        let raw = match self.store.get(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheStore::default(),
            Err(e) => {
                warn!(error = %e, "Lookup cache read failed, treating as empty");
                return CacheStore::default();
            }
        };

        match serde_json::from_str::<CacheStore>(&raw) {
            Ok(mut cache) => {
                cache.sanitize(self.config.max_entries);
                cache
            }
            Err(e) => {
                warn!(error = %e, "Lookup cache data is malformed, treating as empty");
                CacheStore::default()
            }
        }
    }

    /// Persist `cache`. Failures are logged and ignored.
    pub fn write(&self, cache: &CacheStore) {
        let raw = match serde_json::to_string(cache) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to encode lookup cache");
                return;
            }
        };

        if let Err(e) = self.store.set(&self.config.storage_key, &raw) {
            warn!(error = %e, "Lookup cache write failed, continuing without persisting");
        }
    }

    /// Store `results` as the newest entry for `keyword`.
    ///
    /// # Returns
    /// `results`, unchanged.
    pub fn put(&self, keyword: &str, results: Vec<Location>) -> Vec<Location> {
        let key = Self::normalize_key(keyword);
        let mut cache = self.read();

        let entry = CacheEntry::new(results.clone(), Utc::now().timestamp_millis());
        let evicted = cache.insert(key.clone(), entry, self.config.max_entries);
        if !evicted.is_empty() {
            info!(count = evicted.len(), evicted = ?evicted, "Evicted lookup cache entries");
        }

        self.write(&cache);
        debug!(key = %key, results = results.len(), "Cached lookup results");
        results
    }

    /// Results cached for `keyword`, if any.
    pub fn get(&self, keyword: &str) -> Option<Vec<Location>> {
        let key = Self::normalize_key(keyword);
        let mut cache = self.read();
        cache.entries.remove(&key).map(|entry| entry.results)
    }

    /// Find the first cached record whose code matches `code`, ignoring case.
    ///
    /// Keywords are scanned newest first and results in stored order, so when
    /// several keywords hold the same code, the most recently cached wins.
    pub fn find_by_code(&self, code: &str) -> Option<Location> {
        let cache = self.read();
        cache
            .order
            .iter()
            .filter_map(|key| cache.entries.get(key))
            .flat_map(|entry| entry.results.iter())
            .find(|location| location.matches_code(code))
            .cloned()
    }

    /// Cached keywords, newest first.
    pub fn keywords(&self) -> Vec<String> {
        self.read().order
    }

    /// Get current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let cache = self.read();
        CacheStats {
            entries: cache.len(),
            capacity: self.config.max_entries,
            results: cache.entries.values().map(|entry| entry.results.len()).sum(),
        }
    }

    /// Remove every cached keyword.
    pub fn clear(&self) {
        let cleared_count = self.read().len();
        self.write(&CacheStore::default());
        info!(cleared_count, "Cleared lookup cache");
    }

    /// Get the cache configuration.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl fmt::Debug for LookupCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupCache").field("config", &self.config).finish_non_exhaustive()
    }
}
