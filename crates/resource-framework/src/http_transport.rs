//! `reqwest`-backed [`Transport`].
//!
//! Joins relative paths onto a base URL, attaches the bearer token, and opens
//! an `outgoing_http` span per request with the method, URL and final status.

use crate::error::TransportError;
use crate::transport::{Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{field, Instrument, Level};

#[derive(Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpTransport {
    pub fn new(inner: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    /// Builds a client with a per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self::new(inner, base_url))
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; paths are joined onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(&request.url);
        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %request.method,
            http.url = %url,
            http.status_code = field::Empty,
        );

        async {
            let mut builder = self.inner.request(request.method.clone(), &url);
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
            if let Some(token) = &self.bearer_token {
                builder = builder.bearer_auth(token);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());

            let bytes = response
                .bytes()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            if !status.is_success() {
                let body = (!bytes.is_empty()).then(|| {
                    serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                        Value::String(String::from_utf8_lossy(&bytes).into_owned())
                    })
                });
                return Err(TransportError::Status { status, body });
            }

            let data = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?
            };
            Ok(TransportResponse { status, data })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_url_joining() {
        let transport = HttpTransport::new(reqwest::Client::new(), "http://api.local/v1/");
        assert_eq!(transport.url_for("/tenants"), "http://api.local/v1/tenants");
        assert_eq!(transport.url_for("tenants/7"), "http://api.local/v1/tenants/7");
        assert_eq!(
            transport.url_for("https://other.host/x"),
            "https://other.host/x"
        );
    }

    #[tokio::test]
    async fn test_get_with_query_and_token() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/tenants")
                    .query_param("page", "2")
                    .query_param("page_size", "5")
                    .header("authorization", "Bearer secret");
                then.status(200).json_body(json!([{ "id": "t1" }]));
            })
            .await;

        let transport = HttpTransport::new(reqwest::Client::new(), server.base_url())
            .with_bearer_token("secret");
        let request = TransportRequest::new(Method::GET, "/tenants").with_query(vec![
            ("page".into(), "2".into()),
            ("page_size".into(), "5".into()),
        ]);
        let response = transport.send(request).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.data, json!([{ "id": "t1" }]));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/teams")
                    .json_body(json!({ "name": "Blue" }));
                then.status(201).json_body(json!({ "id": "t9", "name": "Blue" }));
            })
            .await;

        let transport = HttpTransport::new(reqwest::Client::new(), server.base_url());
        let request =
            TransportRequest::new(Method::POST, "/teams").with_body(json!({ "name": "Blue" }));
        let response = transport.send(request).await.unwrap();

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.data["id"], "t9");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/teams/t9");
                then.status(204);
            })
            .await;

        let transport = HttpTransport::new(reqwest::Client::new(), server.base_url());
        let response = transport
            .send(TransportRequest::new(Method::DELETE, "/teams/t9"))
            .await
            .unwrap();
        assert_eq!(response.data, Value::Null);
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PATCH).path("/teams/t9");
                then.status(403).json_body(json!({ "message": "read-only role" }));
            })
            .await;

        let transport = HttpTransport::new(reqwest::Client::new(), server.base_url());
        let err = transport
            .send(TransportRequest::new(Method::PATCH, "/teams/t9").with_body(json!({})))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(err.server_message().as_deref(), Some("read-only role"));
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/events");
                then.status(502).body("upstream down");
            })
            .await;

        let transport = HttpTransport::new(reqwest::Client::new(), server.base_url());
        let err = transport
            .send(TransportRequest::new(Method::GET, "/events"))
            .await
            .unwrap_err();
        assert_eq!(err.server_message().as_deref(), Some("upstream down"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        let transport =
            HttpTransport::with_timeout("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = transport
            .send(TransportRequest::new(Method::GET, "/tenants"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
