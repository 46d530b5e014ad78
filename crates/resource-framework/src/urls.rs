//! # URL Maps
//!
//! A [`UrlMap`] is the only place a resource's paths are built. Optional
//! operations (restore, hard delete) are tracked in the type: a map built
//! without [`UrlMap::with_restore`] is a `UrlMap<NoRestore, _>`, and the
//! client built from it simply has no `restore` method.
//!
//! ```rust
//! use resource_framework::urls::UrlMap;
//!
//! let urls = UrlMap::rest("/api/v1/tenants")
//!     .with_restore(|id| format!("/api/v1/tenants/{id}/restore"))
//!     .with_hard_delete(|id| format!("/api/v1/tenants/{id}/hard"));
//!
//! assert_eq!(urls.detail("t1"), "/api/v1/tenants/t1");
//! assert_eq!(urls.restore("t1"), "/api/v1/tenants/t1/restore");
//! ```

use http::Method;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds a path from an id (or another single argument).
pub type PathFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Marker: restore is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRestore;

/// Marker: hard delete is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHardDelete;

/// Restore capability, carrying its path builder.
#[derive(Clone)]
pub struct WithRestore(PathFn);

/// Hard-delete capability, carrying its path builder.
#[derive(Clone)]
pub struct WithHardDelete(PathFn);

/// Endpoint builders for one resource.
#[derive(Clone)]
pub struct UrlMap<R = NoRestore, H = NoHardDelete> {
    create: String,
    list: String,
    detail: PathFn,
    update: PathFn,
    delete: PathFn,
    update_method: Method,
    endpoints: BTreeMap<&'static str, PathFn>,
    restore: R,
    hard_delete: H,
}

fn path_fn<F>(f: F) -> PathFn
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

impl UrlMap {
    /// Conventional layout: `base` for create/list, `base/{id}` for
    /// detail/update/delete.
    pub fn rest(base: impl Into<String>) -> Self {
        let base: String = base.into();
        let base = base.trim_end_matches('/').to_string();
        let item = {
            let base = base.clone();
            path_fn(move |id| format!("{base}/{id}"))
        };
        Self {
            create: base.clone(),
            list: base,
            detail: item.clone(),
            update: item.clone(),
            delete: item,
            update_method: Method::PATCH,
            endpoints: BTreeMap::new(),
            restore: NoRestore,
            hard_delete: NoHardDelete,
        }
    }

    /// Fully explicit map for backends that don't follow the REST layout.
    pub fn new<D, U, X>(
        create: impl Into<String>,
        list: impl Into<String>,
        detail: D,
        update: U,
        delete: X,
    ) -> Self
    where
        D: Fn(&str) -> String + Send + Sync + 'static,
        U: Fn(&str) -> String + Send + Sync + 'static,
        X: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            create: create.into(),
            list: list.into(),
            detail: path_fn(detail),
            update: path_fn(update),
            delete: path_fn(delete),
            update_method: Method::PATCH,
            endpoints: BTreeMap::new(),
            restore: NoRestore,
            hard_delete: NoHardDelete,
        }
    }
}

impl<H> UrlMap<NoRestore, H> {
    pub fn with_restore<F>(self, f: F) -> UrlMap<WithRestore, H>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        UrlMap {
            create: self.create,
            list: self.list,
            detail: self.detail,
            update: self.update,
            delete: self.delete,
            update_method: self.update_method,
            endpoints: self.endpoints,
            restore: WithRestore(path_fn(f)),
            hard_delete: self.hard_delete,
        }
    }
}

impl<R> UrlMap<R, NoHardDelete> {
    pub fn with_hard_delete<F>(self, f: F) -> UrlMap<R, WithHardDelete>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        UrlMap {
            create: self.create,
            list: self.list,
            detail: self.detail,
            update: self.update,
            delete: self.delete,
            update_method: self.update_method,
            endpoints: self.endpoints,
            restore: self.restore,
            hard_delete: WithHardDelete(path_fn(f)),
        }
    }
}

impl<R, H> UrlMap<R, H> {
    /// Use `PUT` instead of `PATCH` for updates.
    pub fn with_put_updates(mut self) -> Self {
        self.update_method = Method::PUT;
        self
    }

    /// Registers a named read-only endpoint (e.g. a derived status view).
    pub fn with_endpoint<F>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.endpoints.insert(name, path_fn(f));
        self
    }

    pub fn create(&self) -> &str {
        &self.create
    }

    pub fn list(&self) -> &str {
        &self.list
    }

    pub fn detail(&self, id: &str) -> String {
        (self.detail)(id)
    }

    pub fn update(&self, id: &str) -> String {
        (self.update)(id)
    }

    pub fn delete(&self, id: &str) -> String {
        (self.delete)(id)
    }

    pub fn update_method(&self) -> &Method {
        &self.update_method
    }

    pub fn endpoint(&self, name: &str, arg: &str) -> Option<String> {
        self.endpoints.get(name).map(|f| f(arg))
    }
}

impl<H> UrlMap<WithRestore, H> {
    pub fn restore(&self, id: &str) -> String {
        (self.restore.0)(id)
    }
}

impl<R> UrlMap<R, WithHardDelete> {
    pub fn hard_delete(&self, id: &str) -> String {
        (self.hard_delete.0)(id)
    }
}

impl<R, H> fmt::Debug for UrlMap<R, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlMap")
            .field("create", &self.create)
            .field("list", &self.list)
            .field("update_method", &self.update_method)
            .field("endpoints", &self.endpoints.keys().collect::<Vec<_>>())
            .field("restore", &std::any::type_name::<R>())
            .field("hard_delete", &std::any::type_name::<H>())
            .finish()
    }
}
