//! Core data types for the lookup cache.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use skyroute_abstraction::Location;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// A cached result set for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Results in the order the remote returned them.
    #[serde(default)]
    pub results: Vec<Location>,
    /// Creation time in epoch milliseconds. Recorded, never used for expiry.
    #[serde(rename = "ts", default)]
    pub timestamp: i64,
}

impl CacheEntry {
    /// Create a new entry stamped with `timestamp`.
    pub fn new(results: Vec<Location>, timestamp: i64) -> Self {
        Self { results, timestamp }
    }
}

/// The persisted cache layout.
///
/// `order` lists normalized keywords, most recently written first. Every key
/// in `order` has an entry and every entry has exactly one key in `order`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStore {
    /// Keyword → cached entry. Unreadable entries are dropped on load.
    #[serde(default, deserialize_with = "deserialize_entries")]
    pub entries: HashMap<String, CacheEntry>,
    /// Keywords, newest first.
    #[serde(default)]
    pub order: Vec<String>,
}

impl CacheStore {
    /// Number of cached keywords.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The entry for an already-normalized key.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Insert `entry` under `key` as the newest keyword, then evict down to
    /// `max_entries`.
    ///
    /// # Returns
    /// The keys that were evicted, oldest last.
    pub fn insert(&mut self, key: String, entry: CacheEntry, max_entries: usize) -> Vec<String> {
        self.order.retain(|existing| existing != &key);
        self.order.insert(0, key.clone());
        self.entries.insert(key, entry);
        self.truncate(max_entries)
    }

    /// Drop keys beyond `max_entries` along with their entries.
    fn truncate(&mut self, max_entries: usize) -> Vec<String> {
        if self.order.len() <= max_entries {
            return Vec::new();
        }

        let evicted = self.order.split_off(max_entries);
        for key in &evicted {
            self.entries.remove(key);
        }
        evicted
    }

    /// Restore the store invariants on data read back from storage.
    ///
    /// Duplicate keys keep their first (newest) position, keys without an
    /// entry and entries without a key are dropped, and the order is cut to
    /// `max_entries`.
    pub fn sanitize(&mut self, max_entries: usize) {
        let mut seen = HashSet::new();
        let entries = &self.entries;
        self.order.retain(|key| entries.contains_key(key) && seen.insert(key.clone()));
        self.entries.retain(|key, _| seen.contains(key));
        self.truncate(max_entries);
    }
}

/// Decode each entry on its own so one unreadable entry does not discard the rest.
fn deserialize_entries<'de, D>(deserializer: D) -> Result<HashMap<String, CacheEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Map::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<CacheEntry>(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                warn!(key = %key, error = %e, "Dropping unreadable lookup cache entry");
                None
            }
        })
        .collect())
}

/// Cache statistics for observability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of cached keywords.
    pub entries: usize,
    /// Maximum number of keywords kept.
    pub capacity: usize,
    /// Total number of result records across all entries.
    pub results: usize,
}
