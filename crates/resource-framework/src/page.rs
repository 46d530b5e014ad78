//! Paginated list responses and bare-array normalization.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items in server order.
    pub data: Vec<T>,
    /// Total matching records server-side.
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u64,
}

/// `ceil(count / page_size)`, with `page_size` treated as at least 1.
pub fn total_pages(count: u64, page_size: u32) -> u64 {
    count.div_ceil(u64::from(page_size.max(1)))
}

impl<T> PaginatedResponse<T> {
    /// Wraps a bare array as if it were one page of itself.
    pub fn from_items(data: Vec<T>, page: u32, page_size: u32) -> Self {
        let count = data.len() as u64;
        Self {
            data,
            count,
            page,
            page_size,
            total_pages: total_pages(count, page_size),
        }
    }
}

impl<T: DeserializeOwned> PaginatedResponse<T> {
    /// Decodes a list payload.
    ///
    /// A JSON array is wrapped with [`PaginatedResponse::from_items`]; an object
    /// is decoded as-is, deriving `total_pages` if the server left it out.
    pub fn normalize(raw: Value, page: u32, page_size: u32) -> Result<Self, serde_json::Error> {
        match raw {
            Value::Array(_) => {
                let data: Vec<T> = serde_json::from_value(raw)?;
                Ok(Self::from_items(data, page, page_size))
            }
            other => {
                let mut response: Self = serde_json::from_value(other)?;
                if response.total_pages == 0 && response.count > 0 {
                    response.total_pages = total_pages(response.count, response.page_size);
                }
                Ok(response)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn test_bare_array_uses_request_paging() {
        let raw = Value::Array((0..12).map(|i| json!(i)).collect());
        let page = PaginatedResponse::<u32>::normalize(raw, 2, 5).unwrap();
        assert_eq!(page.count, 12);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 5);
        assert_eq!(page.data.len(), 12);
    }

    #[test]
    fn test_bare_array_law() {
        for len in [0usize, 1, 4, 5, 6, 17] {
            for size in [1u32, 3, 5] {
                let raw = Value::Array(vec![json!("x"); len]);
                let page = PaginatedResponse::<String>::normalize(raw, 1, size).unwrap();
                assert_eq!(page.count, len as u64);
                assert_eq!(page.total_pages, (len as u64).div_ceil(size as u64));
            }
        }
    }

    #[test]
    fn test_paginated_object_passes_through() {
        let raw = json!({
            "data": ["a", "b"],
            "count": 40,
            "page": 3,
            "page_size": 2,
            "total_pages": 20
        });
        let page = PaginatedResponse::<String>::normalize(raw, 1, 10).unwrap();
        assert_eq!(page.data, vec!["a", "b"]);
        assert_eq!(page.count, 40);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 20);
    }

    #[test]
    fn test_missing_total_pages_is_derived() {
        let raw = json!({ "data": [], "count": 11, "page": 1, "page_size": 5 });
        let page = PaginatedResponse::<String>::normalize(raw, 1, 5).unwrap();
        assert_eq!(page.total_pages, 3);
    }
}
