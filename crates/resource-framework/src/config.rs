//! Declarative per-resource facade configuration.
//!
//! Declared once per resource, validated when the facade is built.

use crate::cache::CacheKey;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds the detail key for an id.
pub type KeyFn = Arc<dyn Fn(&str) -> CacheKey + Send + Sync>;

/// A named extra key family for a resource-specific read.
#[derive(Debug, Clone)]
pub struct AdditionalKey {
    prefix: CacheKey,
    invalidate_on_write: bool,
}

/// Cache-key roots for one resource.
#[derive(Clone)]
pub struct CacheKeys {
    pub list: CacheKey,
    detail: KeyFn,
    additional: BTreeMap<String, AdditionalKey>,
}

impl CacheKeys {
    /// `[name, "list"]` and `[name, "detail", id]`.
    pub fn for_resource(name: &str) -> Self {
        let root = name.to_string();
        Self::new(CacheKey::new(name).with("list"), move |id| {
            CacheKey::new(root.clone()).with("detail").with(id)
        })
    }

    pub fn new<F>(list: CacheKey, detail: F) -> Self
    where
        F: Fn(&str) -> CacheKey + Send + Sync + 'static,
    {
        Self {
            list,
            detail: Arc::new(detail),
            additional: BTreeMap::new(),
        }
    }

    /// Registers an extra key family `prefix + [arg]`.
    ///
    /// When `invalidate_on_write` is set, every successful mutation of the
    /// resource also drops the whole family.
    pub fn with_additional(
        mut self,
        name: impl Into<String>,
        prefix: CacheKey,
        invalidate_on_write: bool,
    ) -> Self {
        self.additional.insert(
            name.into(),
            AdditionalKey {
                prefix,
                invalidate_on_write,
            },
        );
        self
    }

    pub fn detail(&self, id: &str) -> CacheKey {
        (self.detail)(id)
    }

    pub fn additional(&self, name: &str, arg: &str) -> Option<CacheKey> {
        self.additional
            .get(name)
            .map(|extra| extra.prefix.clone().with(arg))
    }

    /// Prefixes of the families coupled to writes.
    pub fn write_coupled(&self) -> impl Iterator<Item = &CacheKey> {
        self.additional
            .values()
            .filter(|extra| extra.invalidate_on_write)
            .map(|extra| &extra.prefix)
    }

    fn all_roots(&self) -> Vec<CacheKey> {
        let mut keys = vec![self.list.clone(), self.detail("probe")];
        keys.extend(self.additional.values().map(|extra| extra.prefix.clone()));
        keys
    }
}

impl fmt::Debug for CacheKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheKeys")
            .field("list", &self.list)
            .field("detail", &self.detail("{id}"))
            .field("additional", &self.additional)
            .finish()
    }
}

/// User-facing text per outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notifications {
    pub create_success: String,
    pub update_success: String,
    pub delete_success: String,
    pub restore_success: String,
    pub hard_delete_success: String,
    /// Used when a failure carries no usable message.
    pub failure_fallback: String,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::for_label("Record")
    }
}

impl Notifications {
    /// Stock messages for a human label such as `"Tenant"`.
    pub fn for_label(label: &str) -> Self {
        Self {
            create_success: format!("{label} created successfully"),
            update_success: format!("{label} updated successfully"),
            delete_success: format!("{label} deleted successfully"),
            restore_success: format!("{label} restored successfully"),
            hard_delete_success: format!("{label} permanently deleted"),
            failure_fallback: "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Everything a facade needs to know about its resource.
#[derive(Debug, Clone)]
pub struct FacadeConfig {
    pub resource_name: String,
    pub cache_keys: CacheKeys,
    pub notifications: Notifications,
}

impl FacadeConfig {
    /// Default keys under `name` with stock messages for `label`.
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            resource_name: name.to_string(),
            cache_keys: CacheKeys::for_resource(name),
            notifications: Notifications::for_label(label),
        }
    }

    pub fn with_cache_keys(mut self, cache_keys: CacheKeys) -> Self {
        self.cache_keys = cache_keys;
        self
    }

    pub fn with_notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = notifications;
        self
    }

    /// Every key must live under `resource_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resource_name.trim().is_empty() {
            return Err(ConfigError::EmptyResourceName);
        }
        for key in self.cache_keys.all_roots() {
            if key.root() != Some(self.resource_name.as_str()) {
                return Err(ConfigError::KeyOutsideNamespace {
                    resource: self.resource_name.clone(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}
