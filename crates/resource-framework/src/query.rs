//! Read results as seen by a consumer (table, form, detail view).

use crate::error::ResourceError;
use std::sync::Arc;

/// Lifecycle of one cached read: `Idle -> Pending -> {Success | Error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Pending,
    Success,
    Error,
}

/// The outcome of a read: data, loading flag and error in one value.
///
/// Failed reads are reported here rather than returned as `Err`, so a view
/// can render whatever state it's in.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<Arc<T>>,
    pub error: Option<ResourceError>,
}

impl<T> QueryState<T> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }

    pub fn pending() -> Self {
        Self {
            status: QueryStatus::Pending,
            data: None,
            error: None,
        }
    }

    pub fn success(data: Arc<T>) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: ResourceError) -> Self {
        Self {
            status: QueryStatus::Error,
            data: None,
            error: Some(error),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn into_result(self) -> Result<Arc<T>, ResourceError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Err(ResourceError::Validation {
                operation: "query",
                message: "no data loaded".to_string(),
            }),
        }
    }
}

impl<T> From<Result<Arc<T>, ResourceError>> for QueryState<T> {
    fn from(result: Result<Arc<T>, ResourceError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failed(error),
        }
    }
}
