//! # Mock Transport & Testing Guide
//!
//! [`MockTransport`] implements [`Transport`] entirely in memory. Tests queue
//! the responses they expect, run the code under test, then check what was
//! sent. No server, no sockets.
//!
//! ## When to use MockTransport vs HttpTransport
//!
//! | Feature | MockTransport | HttpTransport + httpmock |
//! |---------|---------------|--------------------------|
//! | **Speed** | Instant (in-memory) | Fast (local socket) |
//! | **Determinism** | Fully deterministic | Subject to the network stack |
//! | **Use Case** | Client and facade logic | The HTTP mapping itself |
//! | **Error Injection** | Easy (`return_err`, `return_status`) | Per mock server rule |
//!
//! ## Example
//!
//! ```rust
//! use resource_framework::mock::MockTransport;
//! use resource_framework::{Transport, TransportRequest};
//! use http::Method;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect(Method::GET, "/api/tenants/t1")
//!         .return_ok(json!({ "id": "t1" }));
//!
//!     let response = mock
//!         .send(TransportRequest::new(Method::GET, "/api/tenants/t1"))
//!         .await
//!         .unwrap();
//!     assert_eq!(response.data["id"], "t1");
//!
//!     // Ensures every expectation was consumed
//!     mock.verify();
//! }
//! ```
//!
//! ## Simulating slow backends
//!
//! [`ExpectationBuilder::after`] delays the response, which keeps a read
//! in flight long enough to observe de-duplication:
//!
//! ```rust,ignore
//! mock.expect(Method::GET, "/api/teams")
//!     .after(Duration::from_millis(20))
//!     .return_ok(json!([]));
//! ```

use crate::error::TransportError;
use crate::transport::{Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use http::{Method, StatusCode};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// One queued request/response pair.
struct Expectation {
    method: Method,
    url: String,
    delay: Option<Duration>,
    response: Result<TransportResponse, TransportError>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<TransportRequest>,
}

/// An in-memory transport with expectation tracking.
///
/// Expectations are consumed in order. A request that doesn't match the next
/// expectation (or arrives when none is left) panics, failing the test.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mock as a shareable transport handle.
    pub fn shared(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Expects a request with `method` on `url` (query string excluded).
    pub fn expect(&self, method: Method, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            delay: None,
            state: self.state.clone(),
        }
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<TransportRequest> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.state.lock().expectations.len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let expectation = {
            let mut state = self.state.lock();
            state.calls.push(request.clone());
            state.expectations.pop_front()
        };

        let Some(expectation) = expectation else {
            panic!("Unexpected request: {} {}", request.method, request.url);
        };
        if expectation.method != request.method || expectation.url != request.url {
            panic!(
                "Expectation mismatch: expected {} {}, got {} {}",
                expectation.method, expectation.url, request.method, request.url
            );
        }

        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        expectation.response
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder {
    method: Method,
    url: String,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Delays the response by `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Responds `200 OK` with `data`.
    pub fn return_ok(self, data: Value) {
        self.push(Ok(TransportResponse::ok(data)));
    }

    /// Fails with an HTTP status and server body.
    pub fn return_status(self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.push(Err(TransportError::Status {
            status,
            body: Some(body),
        }));
    }

    /// Fails with an arbitrary transport error.
    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<TransportResponse, TransportError>) {
        self.state.lock().expectations.push_back(Expectation {
            method: self.method,
            url: self.url,
            delay: self.delay,
            response,
        });
    }
}
