//! # Transport Seam
//!
//! The [`ResourceClient`](crate::ResourceClient) never talks HTTP directly. It
//! builds a [`TransportRequest`] and hands it to whatever [`Transport`] it was
//! given: [`HttpTransport`](crate::http_transport::HttpTransport) in production,
//! [`MockTransport`](crate::mock::MockTransport) in tests.

use crate::error::TransportError;
use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::Value;

/// A single outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    /// Already sanitized query pairs, in order.
    pub query: Vec<(String, String)>,
}

impl TransportRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            query: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: StatusCode,
    /// Decoded JSON body; `Value::Null` for empty bodies.
    pub data: Value,
}

impl TransportResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }
}

/// Sends requests to the backend.
///
/// Implementations must resolve non-2xx responses to
/// [`TransportError::Status`] with the server body attached, so the caller
/// can classify the failure and show the server's message.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request).await
    }
}
