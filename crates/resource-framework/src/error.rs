//! # Framework Errors
//!
//! This module defines the error types shared by the transport, the
//! [`ResourceClient`](crate::ResourceClient) and the
//! [`ResourceQueryFacade`](crate::ResourceQueryFacade).
//!
//! Errors are `Clone` because a single failed fetch is fanned out to every
//! caller that was waiting on the same in-flight read.

use http::StatusCode;
use serde_json::Value;

/// Failure reported by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}")]
    Status {
        status: StatusCode,
        /// Decoded server body, if any.
        body: Option<Value>,
    },
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("network error: {0}")]
    Network(String),
    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the server in its error body, if any.
    ///
    /// Looks at `message`, `detail` and `error` in that order.
    pub fn server_message(&self) -> Option<String> {
        let TransportError::Status {
            body: Some(body), ..
        } = self
        else {
            return None;
        };
        if let Value::String(s) = body {
            return non_blank(s);
        }
        ["message", "detail", "error"]
            .iter()
            .filter_map(|field| body.get(field))
            .find_map(|v| v.as_str().and_then(non_blank))
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Errors surfaced by resource operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResourceError {
    /// The caller supplied an invalid argument; nothing was sent.
    #[error("{operation}: {message}")]
    Validation {
        operation: &'static str,
        message: String,
    },
    /// The transport failed while running `context`.
    #[error("{context} failed: {cause}")]
    Fetch {
        context: &'static str,
        #[source]
        cause: TransportError,
    },
    /// 401/403. Terminal for the current session.
    #[error("{context} not authorized ({status})")]
    Auth {
        context: &'static str,
        status: StatusCode,
        message: Option<String>,
    },
}

impl ResourceError {
    pub(crate) fn validation(operation: &'static str, message: impl Into<String>) -> Self {
        ResourceError::Validation {
            operation,
            message: message.into(),
        }
    }

    /// Classifies a transport failure for `context`.
    pub fn from_transport(context: &'static str, cause: TransportError) -> Self {
        match cause.status() {
            Some(status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)) => {
                ResourceError::Auth {
                    context,
                    status,
                    message: cause.server_message(),
                }
            }
            _ => ResourceError::Fetch { context, cause },
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ResourceError::Auth { .. })
    }

    /// Whether an automatic retry could succeed.
    ///
    /// Network failures and 5xx are transient. Undecodable bodies, client
    /// errors (4xx), auth failures and validation failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ResourceError::Fetch { cause, .. } => match cause {
                TransportError::Status { status, .. } => !status.is_client_error(),
                TransportError::Network(_) => true,
                TransportError::Decode(_) => false,
            },
            ResourceError::Auth { .. } | ResourceError::Validation { .. } => false,
        }
    }

    /// The most specific message to show a user: the server's own message,
    /// else this error's display text.
    pub fn user_message(&self) -> String {
        let server = match self {
            ResourceError::Fetch { cause, .. } => cause.server_message(),
            ResourceError::Auth { message, .. } => message.clone(),
            ResourceError::Validation { message, .. } => non_blank(message),
        };
        server.unwrap_or_else(|| self.to_string())
    }
}

/// Invalid facade or application configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("resource name must not be empty")]
    EmptyResourceName,
    #[error("cache key {key} is outside the `{resource}` namespace")]
    KeyOutsideNamespace { resource: String, key: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(code: u16, body: Option<Value>) -> TransportError {
        TransportError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body,
        }
    }

    #[test]
    fn test_auth_statuses_are_classified() {
        let err = ResourceError::from_transport("update", status(403, None));
        assert!(err.is_auth());
        assert!(!err.is_transient());

        let err = ResourceError::from_transport("list", status(401, None));
        assert!(err.is_auth());
    }

    #[test]
    fn test_transient_classification() {
        assert!(ResourceError::from_transport("list", status(503, None)).is_transient());
        assert!(ResourceError::from_transport("list", TransportError::Network("reset".into()))
            .is_transient());
        assert!(!ResourceError::from_transport("list", status(404, None)).is_transient());
        assert!(!ResourceError::from_transport("get", TransportError::Decode("eof".into()))
            .is_transient());
        assert!(!ResourceError::validation("get", "empty id").is_transient());
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ResourceError::from_transport(
            "create",
            status(422, Some(json!({ "detail": "Name already taken" }))),
        );
        assert_eq!(err.user_message(), "Name already taken");

        let err = ResourceError::from_transport("create", status(500, Some(json!({}))));
        assert_eq!(err.user_message(), "create failed: HTTP 500 Internal Server Error");
    }

    #[test]
    fn test_auth_carries_server_message() {
        let err = ResourceError::from_transport(
            "delete",
            status(403, Some(json!({ "message": "Forbidden for role viewer" }))),
        );
        assert_eq!(err.user_message(), "Forbidden for role viewer");
    }
}
