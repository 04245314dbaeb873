//! Command implementations for the SkyRoute CLI.

pub mod booking;
pub mod cache;
pub mod flights;
pub mod label;
pub mod search;
pub mod types;

pub use types::{CacheCommand, FlightSearchArgs};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use skyroute_abstraction::KeyValueStore;
use skyroute_client::{FileStore, LookupCache, LookupResolver, MemoryStore, Payload, RemoteProxy};
use std::sync::Arc;
use tracing::debug;

use crate::config::CliConfig;

/// Proxy and resolver wired from the CLI configuration.
pub struct Services {
    pub proxy: Arc<RemoteProxy>,
    pub resolver: LookupResolver,
}

impl Services {
    /// Build the services. With `ephemeral`, the cache lives in memory only.
    pub fn build(config: &CliConfig, ephemeral: bool) -> Result<Self> {
        let client = config.client_config();
        client.validate().context("Invalid configuration")?;

        let proxy = Arc::new(RemoteProxy::from_config(&client.proxy)?);

        let store: Arc<dyn KeyValueStore> = if ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            let path = config.cache_file();
            debug!(path = %path.display(), "Using file-backed lookup cache");
            Arc::new(FileStore::new(path))
        };
        let cache = LookupCache::new(store, client.cache)?;
        let resolver = LookupResolver::new(cache, proxy.clone());

        Ok(Self { proxy, resolver })
    }
}

/// Parse a request payload given inline or as `@path`.
pub fn parse_payload(raw: &str) -> Result<Payload> {
    let content = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file {}", path))?,
        None => raw.to_string(),
    };

    let value: Value = serde_json::from_str(&content).context("Invalid payload: not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("Invalid payload: expected a JSON object"),
    }
}
