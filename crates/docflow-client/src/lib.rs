//! Docflow Extraction Client Layer
//!
//! Implementations of the `ExtractionClient` trait from `docflow-domain`.
//!
//! # Clients
//!
//! - `MockExtractionClient`: Scripted, deterministic client for testing
//! - `HttpExtractionClient`: Hosted extraction service over HTTP
//!
//! # Examples
//!
//! ```
//! use docflow_client::MockExtractionClient;
//! use docflow_domain::traits::ExtractionClient;
//! use docflow_domain::{Category, RawDocument, SchemaRegistry};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let registry = SchemaRegistry::builtin();
//! let catalogs = registry.schema_for(&Category::catalogs()).unwrap();
//!
//! let client = MockExtractionClient::new(json!({"catalog_period": "Q1 2024", "products": []}));
//! let doc = RawDocument::new("catalogs/q1.pdf", Category::catalogs(), b"%PDF".to_vec());
//!
//! let record = client.extract(&doc, &catalogs.schema).await.unwrap();
//! assert_eq!(record.get_str("catalog_period"), Some("Q1 2024"));
//! # });
//! ```

#![warn(missing_docs)]

pub mod http;

use async_trait::async_trait;
use docflow_domain::traits::ExtractionClient;
use docflow_domain::{ExtractedRecord, ExtractionError, RawDocument, SchemaDescription};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use http::HttpExtractionClient;

/// Errors that can occur talking to an extraction service
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client misconfiguration (missing key, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ClientError> for ExtractionError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::InvalidResponse(_) => ExtractionError::schema_mismatch(e.to_string()),
            _ => ExtractionError::transport(e.to_string()),
        }
    }
}

/// Scripted reply of the mock client
#[derive(Debug, Clone)]
enum MockReply {
    Payload(Value),
    Error(ExtractionError),
}

/// Mock extraction client for deterministic testing
///
/// Replies are keyed by document location and fall back to a default
/// payload. Payloads are checked against the requested schema exactly as a
/// real service response would be, so a scripted payload that does not fit
/// surfaces as `SchemaMismatch`.
///
/// Clones share scripts and counters.
#[derive(Debug, Clone)]
pub struct MockExtractionClient {
    default_reply: MockReply,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    calls: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockExtractionClient {
    /// Create a mock returning `payload` for every document
    pub fn new(payload: Value) -> Self {
        Self::with_default(MockReply::Payload(payload))
    }

    /// Create a mock failing every document with `error`
    pub fn failing(error: ExtractionError) -> Self {
        Self::with_default(MockReply::Error(error))
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            replies: Arc::new(Mutex::new(HashMap::new())),
            delays: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return `payload` for the document at `location`
    pub fn add_response(&self, location: impl Into<String>, payload: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(location.into(), MockReply::Payload(payload));
    }

    /// Fail the document at `location` with `error`
    pub fn add_error(&self, location: impl Into<String>, error: ExtractionError) {
        self.replies
            .lock()
            .unwrap()
            .insert(location.into(), MockReply::Error(error));
    }

    /// Sleep for `delay` before answering for the document at `location`
    pub fn add_delay(&self, location: impl Into<String>, delay: Duration) {
        self.delays.lock().unwrap().insert(location.into(), delay);
    }

    /// Number of times `extract` was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Locations passed to `extract`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of concurrent `extract` calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Calls currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Reset the call log
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
        self.max_in_flight.store(0, Ordering::SeqCst);
    }
}

impl Default for MockExtractionClient {
    fn default() -> Self {
        Self::new(Value::Object(Default::default()))
    }
}

/// Decrements the in-flight count when a call finishes or is cancelled
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ExtractionClient for MockExtractionClient {
    async fn extract(
        &self,
        document: &RawDocument,
        schema: &SchemaDescription,
    ) -> Result<ExtractedRecord, ExtractionError> {
        self.calls.lock().unwrap().push(document.location.clone());
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight(Arc::clone(&self.in_flight));
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(&document.location).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&document.location)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Payload(payload) => http::interpret_payload(Some(&payload), schema),
            MockReply::Error(error) => Err(error),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
