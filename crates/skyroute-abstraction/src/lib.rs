//! Shared types and ports for SkyRoute.
//!
//! This crate defines the location record returned by keyword searches, the
//! error types raised by the reservation proxy and the storage adapters, and
//! the two ports the lookup layer is built against: a key-value store for the
//! persisted cache and a remote source of location candidates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// An error raised by the reservation proxy.
///
/// Only the proxy produces this error. The lookup cache and the resolver
/// absorb failures and never surface it to their callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProxyError {
    /// The request never produced a response (connection refused, DNS, reset).
    #[error("{message}")]
    Transport {
        /// Best-effort description of the network failure.
        message: String,
    },

    /// The remote answered with a non-success status or an `error` field.
    #[error("{message}")]
    Remote {
        /// The envelope's `error` field, the status reason, or a generic fallback.
        message: String,
        /// HTTP status code of the response.
        status: u16,
        /// The envelope's `details` field, or the whole body when absent.
        details: Value,
    },
}

impl ProxyError {
    /// The human-readable message, identical to the `Display` output.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message } | Self::Remote { message, .. } => message,
        }
    }

    /// Structured diagnostic payload attached by the remote, if any.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Transport { .. } => None,
            Self::Remote { details, .. } => Some(details),
        }
    }

    /// HTTP status of a remote failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { .. } => None,
            Self::Remote { status, .. } => Some(*status),
        }
    }
}

/// An error raised by a [`KeyValueStore`] implementation.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing data could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    Serialization(String),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    LockPoisoned,

    /// The store refused the write (quota exceeded, storage disabled).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// An airport or location candidate returned by a keyword search.
///
/// The record is kept exactly as the remote sent it. `code`, `name`,
/// `cityName` and `city` are read through accessors; a field that is missing,
/// `null`, empty or not a string reads as absent. Nothing in the record is
/// rewritten, so a cached record serializes back to the original JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(Value);

impl Default for Location {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl Location {
    /// Creates a record carrying only a code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self::default().with_field("code", code.into())
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_field("name", name.into())
    }

    /// Sets the city name.
    #[must_use]
    pub fn with_city(self, city: impl Into<String>) -> Self {
        self.with_field("cityName", city.into())
    }

    /// Sets an arbitrary attribute. Ignored when the record is not an object.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Value::Object(fields) = &mut self.0 {
            fields.insert(key.to_string(), value.into());
        }
        self
    }

    /// The raw attribute stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The record as received.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The code, if present and non-empty.
    pub fn code(&self) -> Option<&str> {
        self.text("code")
    }

    /// The display name, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    /// The city, preferring `cityName` over `city`.
    pub fn city(&self) -> Option<&str> {
        self.text("cityName").or_else(|| self.text("city"))
    }

    /// Whether this record's code equals `code` once both are uppercased.
    pub fn matches_code(&self, code: &str) -> bool {
        self.code().is_some_and(|own| own.to_uppercase() == code.to_uppercase())
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }
}

impl From<Value> for Location {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Location> for Value {
    fn from(location: Location) -> Self {
        location.0
    }
}

/// A synchronous key-value store holding string blobs.
///
/// This is the port behind the persisted lookup cache. Implementations must
/// not suspend, which keeps a cache read-modify-write free of await points.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// A remote source of location candidates for a keyword.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Searches the remote for locations matching `keyword`.
    ///
    /// # Errors
    /// Returns a `ProxyError` if the request fails or the remote reports an error.
    async fn search_locations(&self, keyword: &str) -> Result<Vec<Location>, ProxyError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_preserves_unknown_fields() {
        let raw = json!({
            "code": "TXL",
            "name": "Tegel",
            "cityName": "Berlin",
            "subType": "AIRPORT",
            "geoCode": {"latitude": 52.55, "longitude": 13.29}
        });

        let location: Location = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(location.code(), Some("TXL"));
        assert_eq!(location.city(), Some("Berlin"));
        assert_eq!(location.get("subType"), Some(&json!("AIRPORT")));

        assert_eq!(serde_json::to_value(&location).unwrap(), raw);
    }

    #[test]
    fn test_location_city_fallback() {
        let location: Location =
            serde_json::from_value(json!({"code": "MUC", "city": "Munich"})).unwrap();
        assert_eq!(location.city(), Some("Munich"));

        let location: Location =
            serde_json::from_value(json!({"code": "MUC", "cityName": "", "city": "München"}))
                .unwrap();
        assert_eq!(location.city(), Some("München"));
    }

    #[test]
    fn test_location_keeps_odd_fields_and_nulls() {
        let raw = json!({"code": "BER", "name": 5, "cityName": null, "detailedName": 7});

        let location: Location = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(location.code(), Some("BER"));
        assert_eq!(location.name(), None);
        assert_eq!(location.city(), None);
        assert_eq!(serde_json::to_value(&location).unwrap(), raw);

        let scalar: Location = serde_json::from_value(json!("TXL")).unwrap();
        assert_eq!(scalar.code(), None);
        assert!(!scalar.matches_code("TXL"));
    }

    #[test]
    fn test_matches_code_ignores_case() {
        let location = Location::new("TXL");
        assert!(location.matches_code("txl"));
        assert!(location.matches_code("TXL"));
        assert!(!location.matches_code("TX"));
        assert!(!Location::default().matches_code(""));

        let location = Location::new("ÄRH");
        assert!(location.matches_code("ärh"));
        assert!(location.matches_code(&"ärh".to_uppercase()));
    }

    #[test]
    fn test_proxy_error_accessors() {
        let error = ProxyError::Remote {
            message: "Invalid date".to_string(),
            status: 400,
            details: json!({"field": "departureDate"}),
        };
        assert_eq!(error.to_string(), "Invalid date");
        assert_eq!(error.message(), "Invalid date");
        assert_eq!(error.status(), Some(400));
        assert_eq!(error.details(), Some(&json!({"field": "departureDate"})));

        let error = ProxyError::Transport { message: "Network error: refused".to_string() };
        assert_eq!(error.message(), "Network error: refused");
        assert!(error.details().is_none());
        assert!(error.status().is_none());
    }
}
