//! List query parameters and their wire sanitization.

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paging, filtering and sorting for a list read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListParams {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    /// Opaque structured-query payload, already serialized by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Resource-specific query fields. Blank values are dropped.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Option<String>>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

impl ListParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            filter: None,
            sort: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.page < 1 {
            return Err(ResourceError::validation("list", "page must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(ResourceError::validation(
                "list",
                "page_size must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Query pairs to send. Absent and blank values never appear.
    ///
    /// Order is stable (`page`, `page_size`, `filter`, `sort`, then extras by
    /// key) so the result doubles as a cache-key qualifier.
    pub fn sanitized(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        let optional = [("filter", &self.filter), ("sort", &self.sort)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .chain(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        for (key, value) in optional {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                if !key.trim().is_empty() {
                    pairs.push((key, value));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_drops_blank_and_absent() {
        let params = ListParams::new(2, 5)
            .with_filter("")
            .with_sort("name")
            .with_field("status", Some("  ".into()))
            .with_field("owner", None)
            .with_field("region", Some("eu".into()));

        let pairs = params.sanitized();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("page_size".to_string(), "5".to_string()),
                ("sort".to_string(), "name".to_string()),
                ("region".to_string(), "eu".to_string()),
            ]
        );
    }

    #[test]
    fn test_sanitized_is_subset_of_supplied() {
        let params = ListParams::new(1, 20)
            .with_filter("name eq 'x'")
            .with_field("kind", Some("a".into()));
        for (key, value) in params.sanitized() {
            assert!(!value.is_empty());
            let supplied = match key.as_str() {
                "page" => Some(params.page.to_string()),
                "page_size" => Some(params.page_size.to_string()),
                "filter" => params.filter.clone(),
                "sort" => params.sort.clone(),
                other => params.extra.get(other).cloned().flatten(),
            };
            assert_eq!(supplied.as_deref(), Some(value.as_str()));
        }
    }

    #[test]
    fn test_validate() {
        assert!(ListParams::new(1, 1).validate().is_ok());
        assert!(ListParams::new(0, 10).validate().is_err());
        assert!(ListParams::new(1, 0).validate().is_err());
    }
}
