//! Integration tests: resolver, cache and proxy against a mock backend.

use async_trait::async_trait;
use mockito::Matcher;
use serde_json::json;
use skyroute_abstraction::{Location, LocationSource, ProxyError};
use skyroute_client::{
    CacheConfig, FileStore, LookupCache, LookupOutcome, LookupResolver, MemoryStore, RemoteProxy,
};
use std::sync::Arc;
use tempfile::TempDir;

const AIRPORTS_BERLIN: &str = r#"{"data": [
    {"code": "BER", "name": "Brandenburg", "cityName": "Berlin", "subType": "AIRPORT"},
    {"code": "TXL", "name": "Tegel", "cityName": "Berlin", "subType": "AIRPORT"}
]}"#;

fn resolver_for(server_url: String) -> LookupResolver {
    let cache = LookupCache::with_defaults(Arc::new(MemoryStore::new()));
    LookupResolver::new(cache, Arc::new(RemoteProxy::new(server_url)))
}

#[tokio::test]
async fn test_repeated_search_hits_network_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/amadeus/airports/search")
        .match_body(Matcher::Json(json!({"keyword": "Berlin"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(AIRPORTS_BERLIN)
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver_for(server.url());

    let first = resolver.search_by_keyword("Berlin").await;
    let second = resolver.search_by_keyword("Berlin").await;

    assert_eq!(first.len(), 2);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(second[1].get("subType"), Some(&json!("AIRPORT")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_resolve_label_through_remote_then_cache() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/amadeus/airports/search")
        .match_body(Matcher::Json(json!({"keyword": "TXL"})))
        .with_status(200)
        .with_body(AIRPORTS_BERLIN)
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver_for(server.url());

    assert_eq!(resolver.resolve_label("txl").await, "Berlin – Tegel (TXL)");
    // BER was cached alongside TXL and resolves without another request.
    assert_eq!(resolver.resolve_label("ber").await, "Berlin – Brandenburg (BER)");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_remote_error_degrades_to_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/amadeus/airports/search")
        .with_status(500)
        .with_body(r#"{"error": "Upstream unavailable"}"#)
        .create_async()
        .await;

    let resolver = resolver_for(server.url());

    assert_eq!(resolver.lookup("Berlin").await, LookupOutcome::Empty);
    assert_eq!(resolver.resolve_label("txl").await, "TXL");
    assert!(resolver.cache().keywords().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_never_throws() {
    let resolver = resolver_for("http://127.0.0.1:9".to_string());

    assert!(resolver.search_by_keyword("Berlin").await.is_empty());
    assert_eq!(resolver.resolve_label("txl").await, "TXL");
    assert_eq!(resolver.resolve_label("").await, "");
}

/// Source that caches a result for the keyword and then fails, the way an
/// overlapping identical lookup can populate the key before the failure lands.
struct RacingSource {
    cache: LookupCache,
}

#[async_trait]
impl LocationSource for RacingSource {
    async fn search_locations(&self, keyword: &str) -> Result<Vec<Location>, ProxyError> {
        self.cache.put(keyword, vec![Location::new("TXL").with_name("Tegel")]);
        Err(ProxyError::Transport { message: "connection reset".to_string() })
    }
}

#[tokio::test]
async fn test_failure_returns_stale_value_when_present() {
    let cache = LookupCache::with_defaults(Arc::new(MemoryStore::new()));
    let source = Arc::new(RacingSource { cache: cache.clone() });
    let resolver = LookupResolver::new(cache, source);

    let outcome = resolver.lookup("Tegel").await;

    assert_eq!(outcome, LookupOutcome::Fallback(vec![Location::new("TXL").with_name("Tegel")]));
}

#[tokio::test]
async fn test_file_backed_cache_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/amadeus/airports/search")
        .with_status(200)
        .with_body(AIRPORTS_BERLIN)
        .expect(1)
        .create_async()
        .await;

    {
        let cache = LookupCache::with_defaults(Arc::new(FileStore::new(&path)));
        let resolver = LookupResolver::new(cache, Arc::new(RemoteProxy::new(server.url())));
        assert_eq!(resolver.search_by_keyword("Berlin").await.len(), 2);
    }

    let cache = LookupCache::with_defaults(Arc::new(FileStore::new(&path)));
    let resolver = LookupResolver::new(cache, Arc::new(RemoteProxy::new(server.url())));
    assert!(matches!(resolver.lookup("BERLIN").await, LookupOutcome::Hit(results) if results.len() == 2));
    mock.assert_async().await;

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let blob: serde_json::Value =
        serde_json::from_str(raw["iata_lookup_cache_v1"].as_str().unwrap()).unwrap();
    assert_eq!(blob["order"], json!(["berlin"]));
    assert!(blob["entries"]["berlin"]["ts"].is_i64());
}

#[tokio::test]
async fn test_small_cache_evicts_through_resolver() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/amadeus/airports/search")
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create_async()
        .await;

    let config = CacheConfig { max_entries: 3, ..CacheConfig::default() };
    let cache = LookupCache::new(Arc::new(MemoryStore::new()), config).unwrap();
    let resolver = LookupResolver::new(cache, Arc::new(RemoteProxy::new(server.url())));

    for keyword in ["a", "b", "c", "d", "e"] {
        resolver.search_by_keyword(keyword).await;
    }

    assert_eq!(resolver.cache().keywords(), vec!["e", "d", "c"]);
}

#[tokio::test]
async fn test_booking_flow_propagates_errors() {
    let mut server = mockito::Server::new_async().await;
    let hold = server
        .mock("POST", "/api/amadeus/hold")
        .with_status(200)
        .with_body(r#"{"data": {"amadeus_order_id": "eJzTd9f3NjIJdg8HAAtPAlE=", "id": 31}}"#)
        .create_async()
        .await;
    let ticket = server
        .mock("POST", "/api/amadeus/ticket")
        .match_body(Matcher::PartialJson(json!({"bookingId": 31})))
        .with_status(400)
        .with_body(r#"{"error": "Invalid date"}"#)
        .create_async()
        .await;

    let proxy = RemoteProxy::new(server.url());

    let held = proxy.hold(serde_json::Map::new()).await.unwrap();
    assert_eq!(
        skyroute_client::booking_reference(&held),
        Some("eJzTd9f3NjIJdg8HAAtPAlE=".to_string())
    );

    let mut payload = serde_json::Map::new();
    payload.insert("bookingId".to_string(), held["id"].clone());
    let err = proxy.ticket(payload).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid date");
    assert_eq!(err.details(), Some(&json!({"error": "Invalid date"})));

    hold.assert_async().await;
    ticket.assert_async().await;
}
