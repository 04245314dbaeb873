//! Remote proxy for the reservation API.
//!
//! Every operation is a JSON `POST` against the backend's `/api/amadeus/*`
//! endpoints. Responses share one envelope, `{ data, error?, details? }`, and
//! one classification rule: a non-success status or a truthy `error` field is
//! a failure, anything else yields `data`.
//!
//! ```no_run
//! use skyroute_client::RemoteProxy;
//! use serde_json::{json, Map, Value};
//!
//! # async fn example() -> Result<(), skyroute_abstraction::ProxyError> {
//! let proxy = RemoteProxy::new("http://localhost:3000");
//!
//! let mut payload = Map::new();
//! payload.insert("originLocationCode".to_string(), json!("MUC"));
//! payload.insert("destinationLocationCode".to_string(), json!("IST"));
//! payload.insert("departureDate".to_string(), json!("2026-02-14"));
//!
//! let offers: Value = proxy.search(payload).await?;
//! println!("{offers}");
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value, json};
use skyroute_abstraction::{Location, LocationSource, ProxyError};
use tracing::{debug, error};

use crate::config::ProxyConfig;

/// Keyword search for airports and locations.
pub const AIRPORT_SEARCH_PATH: &str = "/api/amadeus/airports/search";
/// Flight offer search.
pub const FLIGHT_SEARCH_PATH: &str = "/api/amadeus/search";
/// Reservation hold.
pub const HOLD_PATH: &str = "/api/amadeus/hold";
/// Ticket issue.
pub const TICKET_PATH: &str = "/api/amadeus/ticket";

/// Message used when neither the body nor the status explain a failure.
const GENERIC_FAILURE: &str = "Request failed";

/// A request body: plain JSON attributes.
pub type Payload = Map<String, Value>;

/// Client for the reservation backend.
#[derive(Debug, Clone)]
pub struct RemoteProxy {
    /// Base URL without a trailing slash.
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

impl RemoteProxy {
    /// Creates a proxy for `base_url` with no request timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Creates a proxy from configuration.
    ///
    /// # Errors
    /// Returns a `ProxyError::Transport` if the HTTP client cannot be built.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ProxyError::Transport {
            message: format!("Failed to create HTTP client: {}", e),
        })?;
        Ok(Self::with_client(config.base_url.clone(), client))
    }

    /// Creates a proxy that sends requests through `client`.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Searches flight offers.
    ///
    /// Default passenger, currency and cabin attributes are merged under
    /// `payload`; values supplied by the caller win.
    ///
    /// # Errors
    /// Returns a `ProxyError` if the request fails or the envelope reports an error.
    pub async fn search(&self, payload: Payload) -> Result<Value, ProxyError> {
        let body = Value::Object(with_search_defaults(payload));
        self.post(FLIGHT_SEARCH_PATH, &body).await
    }

    /// Places a reservation hold, creating a pending booking upstream.
    ///
    /// # Errors
    /// Returns a `ProxyError` if the request fails or the envelope reports an error.
    pub async fn hold(&self, payload: Payload) -> Result<Value, ProxyError> {
        self.post(HOLD_PATH, &Value::Object(payload)).await
    }

    /// Issues tickets for a previously held booking.
    ///
    /// # Errors
    /// Returns a `ProxyError` if the request fails or the envelope reports an error.
    pub async fn ticket(&self, payload: Payload) -> Result<Value, ProxyError> {
        self.post(TICKET_PATH, &Value::Object(payload)).await
    }

    /// Searches airports and locations matching `keyword`.
    ///
    /// Records are returned as received and in order. A `data` field that is
    /// not an array yields no results.
    ///
    /// # Errors
    /// Returns a `ProxyError` if the request fails or the envelope reports an error.
    pub async fn search_airports(&self, keyword: &str) -> Result<Vec<Location>, ProxyError> {
        let data = self.post(AIRPORT_SEARCH_PATH, &json!({ "keyword": keyword })).await?;

        let Value::Array(items) = data else {
            debug!(keyword, "Airport search returned no result array");
            return Ok(Vec::new());
        };

        Ok(items.into_iter().map(Location::from).collect())
    }

    /// Sends `body` to `path` and classifies the response envelope.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ProxyError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending proxy request");

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to send proxy request");
            transport_error(&e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.unwrap_or_default();

        classify_response(status, &bytes).inspect_err(|e| {
            error!(status = %status, error = %e, path, "Proxy request failed");
        })
    }
}

#[async_trait]
impl LocationSource for RemoteProxy {
    async fn search_locations(&self, keyword: &str) -> Result<Vec<Location>, ProxyError> {
        self.search_airports(keyword).await
    }
}

fn transport_error(e: &reqwest::Error) -> ProxyError {
    let message = if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else if e.is_connect() {
        format!("Backend not reachable: {}", e)
    } else {
        format!("Network error: {}", e)
    };
    ProxyError::Transport { message }
}

/// Default attributes of a flight search.
pub fn search_defaults() -> Payload {
    let mut defaults = Map::new();
    defaults.insert("adults".to_string(), json!(1));
    defaults.insert("children".to_string(), json!(0));
    defaults.insert("infants".to_string(), json!(0));
    defaults.insert("currencyCode".to_string(), json!("EUR"));
    defaults.insert("travelClass".to_string(), json!("ECONOMY"));
    defaults.insert("nonStop".to_string(), json!(false));
    defaults
}

/// Merge the flight search defaults under `payload`.
pub fn with_search_defaults(payload: Payload) -> Payload {
    let mut merged = search_defaults();
    merged.extend(payload);
    merged
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Classify a response envelope.
///
/// The body is parsed as JSON, falling back to an empty object. A non-success
/// status or a truthy `error` field is a failure whose message is the `error`
/// field, else the status reason phrase, else a generic message, and whose
/// details are the body's `details` field, else the whole body.
///
/// # Errors
/// Returns `ProxyError::Remote` when the response is classified as a failure.
pub fn classify_response(status: StatusCode, body: &[u8]) -> Result<Value, ProxyError> {
    let mut body: Value = serde_json::from_slice(body).unwrap_or_else(|_| json!({}));

    let error_message = body.get("error").filter(|value| is_truthy(value)).map(|value| {
        match value {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        }
    });

    if !status.is_success() || error_message.is_some() {
        let message = error_message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .filter(|reason| !reason.is_empty())
                .unwrap_or(GENERIC_FAILURE)
                .to_string()
        });
        let details = body.get("details").filter(|details| !details.is_null()).cloned().unwrap_or(body);
        return Err(ProxyError::Remote { message, status: status.as_u16(), details });
    }

    Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
}

/// Reference of a held booking: `amadeus_pnr`, else `amadeus_order_id`, else `id`.
pub fn booking_reference(data: &Value) -> Option<String> {
    first_reference(data, &["amadeus_pnr", "amadeus_order_id", "id"])
}

/// Reference of an issued ticket: `amadeus_ticket_number`, else
/// `amadeus_order_id`, else `id`.
pub fn ticket_reference(data: &Value) -> Option<String> {
    first_reference(data, &["amadeus_ticket_number", "amadeus_order_id", "id"])
}

fn first_reference(data: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match data.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
