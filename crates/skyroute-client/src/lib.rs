//! Location lookup and reservation proxy client for SkyRoute.
//!
//! # Components
//!
//! - **LookupCache**: bounded, persisted keyword → results cache
//! - **LookupResolver**: cache-first keyword search and code-to-label resolution
//! - **RemoteProxy**: airport search, flight search, hold and ticket requests
//!   against the `/api/amadeus/*` backend
//! - **Storage**: in-memory and file-backed key-value stores for the cache

pub mod cache;
pub mod config;
pub mod proxy;
pub mod resolver;
pub mod storage;

pub use cache::{CacheConfig, CacheConfigError, CacheEntry, CacheStats, CacheStore, LookupCache};
pub use config::{ClientConfig, ConfigError, ProxyConfig};
pub use proxy::{Payload, RemoteProxy, booking_reference, classify_response, ticket_reference};
pub use resolver::{LookupOutcome, LookupResolver, format_label};
pub use storage::{FileStore, MemoryStore};
