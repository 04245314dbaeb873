//! Keyword search and code resolution on top of the lookup cache.
//!
//! The resolver is stateless: it reads through the [`LookupCache`] and falls
//! back to a [`LocationSource`] on a miss. Failures of the source are
//! absorbed so typeahead-style callers always get a (possibly empty) list.

use skyroute_abstraction::{Location, LocationSource};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::LookupCache;

/// Where the results of a keyword lookup came from.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The keyword was cached; no network access happened.
    Hit(Vec<Location>),
    /// The keyword was fetched from the source and cached.
    Fetched(Vec<Location>),
    /// The source failed and a cached value for the keyword was returned.
    Fallback(Vec<Location>),
    /// Blank keyword, or the source failed with nothing cached.
    Empty,
}

impl LookupOutcome {
    /// The results, empty for [`LookupOutcome::Empty`].
    pub fn into_results(self) -> Vec<Location> {
        match self {
            Self::Hit(results) | Self::Fetched(results) | Self::Fallback(results) => results,
            Self::Empty => Vec::new(),
        }
    }

    /// Short name of the outcome, for logs and CLI output.
    pub fn source(&self) -> &'static str {
        match self {
            Self::Hit(_) => "cache",
            Self::Fetched(_) => "remote",
            Self::Fallback(_) => "stale-cache",
            Self::Empty => "none",
        }
    }
}

/// Cache-first resolver for location keywords and codes.
#[derive(Clone)]
pub struct LookupResolver {
    cache: LookupCache,
    source: Arc<dyn LocationSource>,
}

impl LookupResolver {
    /// Create a resolver reading through `cache` and falling back to `source`.
    #[must_use]
    pub fn new(cache: LookupCache, source: Arc<dyn LocationSource>) -> Self {
        Self { cache, source }
    }

    /// The cache this resolver reads through.
    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    /// Search locations for `keyword`, cache first.
    ///
    /// Never fails: a source failure yields the cached value for the keyword
    /// if one exists, else an empty list.
    pub async fn search_by_keyword(&self, keyword: &str) -> Vec<Location> {
        self.lookup(keyword).await.into_results()
    }

    /// Search locations for `keyword` and report where the results came from.
    pub async fn lookup(&self, keyword: &str) -> LookupOutcome {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return LookupOutcome::Empty;
        }

        if let Some(results) = self.cache.get(keyword) {
            debug!(keyword, results = results.len(), "Lookup cache hit");
            return LookupOutcome::Hit(results);
        }

        debug!(keyword, "Lookup cache miss, querying remote");
        match self.source.search_locations(keyword).await {
            Ok(results) => LookupOutcome::Fetched(self.cache.put(keyword, results)),
            Err(e) => {
                warn!(keyword, error = %e, "Location search failed, using cached data");
                match self.cache.get(keyword) {
                    Some(results) => LookupOutcome::Fallback(results),
                    None => LookupOutcome::Empty,
                }
            }
        }
    }

    /// Resolve a location code to a human-readable label.
    ///
    /// The code is trimmed and uppercased, and records match when their own
    /// code uppercases to the same string. Cached records are checked first,
    /// then a keyword search for the code itself. When nothing matches, the
    /// normalized code is returned; the result is empty only for blank input.
    pub async fn resolve_label(&self, code: &str) -> String {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return String::new();
        }

        if let Some(location) = self.cache.find_by_code(&code) {
            return format_label(&location);
        }

        let results = self.search_by_keyword(&code).await;
        results
            .iter()
            .find(|location| location.matches_code(&code))
            .map_or(code, format_label)
    }
}

impl fmt::Debug for LookupResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupResolver").field("cache", &self.cache).finish_non_exhaustive()
    }
}

/// Format a location as a display label.
///
/// - city, name and code: `"{city} – {name} ({code})"`
/// - name and code: `"{name} ({code})"`
/// - city and code: `"{city} ({code})"`
/// - otherwise the code, else the name, else `""`
pub fn format_label(location: &Location) -> String {
    match (location.city(), location.name(), location.code()) {
        (Some(city), Some(name), Some(code)) => format!("{city} – {name} ({code})"),
        (None, Some(name), Some(code)) => format!("{name} ({code})"),
        (Some(city), None, Some(code)) => format!("{city} ({code})"),
        (_, name, code) => code.or(name).unwrap_or_default().to_string(),
    }
}
