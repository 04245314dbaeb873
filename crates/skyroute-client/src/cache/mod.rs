//! Persisted lookup cache for keyword search results.
//!
//! Results are stored per lowercased keyword in a single blob on a
//! [`KeyValueStore`](skyroute_abstraction::KeyValueStore), bounded to the most
//! recently written keywords.

pub mod config;
pub mod lookup;
pub mod types;

pub use config::{CacheConfig, CacheConfigError, DEFAULT_MAX_ENTRIES, DEFAULT_STORAGE_KEY};
pub use lookup::LookupCache;
pub use types::{CacheEntry, CacheStats, CacheStore};
