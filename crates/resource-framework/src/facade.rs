//! # Resource Query Facade
//!
//! [`ResourceQueryFacade`] wraps a [`ResourceClient`] with the behavior every
//! screen expects from a resource:
//!
//! * **Cached reads** – `list` and `get_by_id` are keyed, de-duplicated and
//!   retried on transient failures.
//! * **Pessimistic writes** – a mutation touches the cache only after the
//!   server confirmed it, and only then emits its success message.
//! * **One notification per outcome** – through the injected
//!   [`NotificationSink`], never a UI type.
//!
//! ## Write ordering
//!
//! For every successful mutation:
//!
//! 1. the client call resolves,
//! 2. the list prefix is invalidated, then the detail key (when the mutation
//!    names an id), then any write-coupled additional keys,
//! 3. the success notification is emitted.
//!
//! A failed mutation invalidates nothing and emits exactly one error
//! notification before the error is handed back.

use crate::cache::{CacheKey, QueryCache};
use crate::client::{checked_id, ResourceClient};
use crate::config::FacadeConfig;
use crate::error::{ConfigError, ResourceError};
use crate::notify::{
    LogSessionListener, Notification, NotificationSink, SessionListener, TracingSink,
};
use crate::page::PaginatedResponse;
use crate::params::ListParams;
use crate::query::QueryState;
use crate::resource::Resource;
use crate::retry::RetryPolicy;
use crate::urls::{NoHardDelete, NoRestore, WithHardDelete, WithRestore};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Services shared by all facades of one application.
///
/// Built once at startup and cloned into every facade. The cache is the
/// process-wide one; each facade only writes under its own resource name.
#[derive(Clone)]
pub struct QueryContext {
    pub cache: QueryCache,
    pub sink: Arc<dyn NotificationSink>,
    pub session: Arc<dyn SessionListener>,
    pub retry: RetryPolicy,
}

impl QueryContext {
    pub fn new(cache: QueryCache, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            cache,
            sink,
            session: Arc::new(LogSessionListener),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_session_listener(mut self, session: Arc<dyn SessionListener>) -> Self {
        self.session = session;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new(QueryCache::new(), Arc::new(TracingSink))
    }
}

/// Emits outcome notifications for one resource.
#[derive(Clone)]
struct Notifier {
    sink: Arc<dyn NotificationSink>,
    session: Arc<dyn SessionListener>,
    config: Arc<FacadeConfig>,
}

impl Notifier {
    fn success(&self, message: &str) {
        self.sink.emit(Notification::success(message));
    }

    fn failure(&self, context: &'static str, error: &ResourceError) {
        let resource = self.config.resource_name.as_str();
        info!(resource, context, error = %error, "Operation failed");
        if error.is_auth() {
            self.session.session_ended(resource, error);
        }
        let message = error.user_message();
        let message = if message.trim().is_empty() {
            self.config.notifications.failure_fallback.clone()
        } else {
            message
        };
        self.sink.emit(Notification::error(message));
    }
}

/// The per-resource bundle of cached reads and notifying writes.
pub struct ResourceQueryFacade<E: Resource, R = NoRestore, H = NoHardDelete> {
    client: ResourceClient<E, R, H>,
    config: Arc<FacadeConfig>,
    ctx: QueryContext,
    notifier: Notifier,
}

impl<E: Resource, R, H> Clone for ResourceQueryFacade<E, R, H> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone(),
            ctx: self.ctx.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<E, R, H> ResourceQueryFacade<E, R, H>
where
    E: Resource,
    R: Send + Sync + 'static,
    H: Send + Sync + 'static,
{
    pub fn new(
        client: ResourceClient<E, R, H>,
        config: FacadeConfig,
        ctx: QueryContext,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let config = Arc::new(config);
        let notifier = Notifier {
            sink: ctx.sink.clone(),
            session: ctx.session.clone(),
            config: config.clone(),
        };
        debug!(resource = %config.resource_name, "Facade ready");
        Ok(Self {
            client,
            config,
            ctx,
            notifier,
        })
    }

    pub fn client(&self) -> &ResourceClient<E, R, H> {
        &self.client
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// `list` root plus the sanitized query pairs, in order. Each pair adds
    /// two segments, name then value.
    pub fn list_key(&self, params: &ListParams) -> CacheKey {
        params
            .sanitized()
            .into_iter()
            .fold(self.config.cache_keys.list.clone(), |key, (k, v)| {
                key.with(k).with(v)
            })
    }

    pub fn detail_key(&self, id: &E::Id) -> CacheKey {
        self.config.cache_keys.detail(&id.to_string())
    }

    // --- Reads ---

    pub async fn list(&self, params: &ListParams) -> QueryState<PaginatedResponse<E::Out>> {
        if let Err(err) = params.validate() {
            self.notifier.failure("list", &err);
            return QueryState::failed(err);
        }
        let key = self.list_key(params);
        let client = self.client.clone();
        let params = params.clone();
        self.read("list", key, move || {
            let client = client.clone();
            let params = params.clone();
            async move { client.list(&params).await }
        })
        .await
    }

    pub async fn get_by_id(&self, id: &E::Id) -> QueryState<E::Out> {
        if let Err(err) = checked_id("get", id) {
            self.notifier.failure("get", &err);
            return QueryState::failed(err);
        }
        let key = self.detail_key(id);
        let client = self.client.clone();
        let id = id.clone();
        self.read("get", key, move || {
            let client = client.clone();
            let id = id.clone();
            async move { client.get_by_id(&id).await }
        })
        .await
    }

    /// Cached read of a named endpoint under the matching additional key.
    pub async fn query_additional<T>(&self, name: &str, arg: &str) -> QueryState<T>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let Some(key) = self.config.cache_keys.additional(name, arg) else {
            let err = ResourceError::Validation {
                operation: "endpoint",
                message: format!("no cache key named `{name}`"),
            };
            self.notifier.failure("endpoint", &err);
            return QueryState::failed(err);
        };
        let client = self.client.clone();
        let (name, arg) = (name.to_string(), arg.to_string());
        self.read("endpoint", key, move || {
            let client = client.clone();
            let (name, arg) = (name.clone(), arg.clone());
            async move { client.fetch_endpoint::<T>(&name, &arg).await }
        })
        .await
    }

    /// Current state of a list read, without fetching.
    pub fn list_state(&self, params: &ListParams) -> QueryState<PaginatedResponse<E::Out>> {
        self.ctx.cache.snapshot(&self.list_key(params))
    }

    /// Current state of a detail read, without fetching.
    pub fn detail_state(&self, id: &E::Id) -> QueryState<E::Out> {
        self.ctx.cache.snapshot(&self.detail_key(id))
    }

    /// Shared read path: cache, de-duplication, retry, failure notification.
    ///
    /// The notification is part of the shared fetch, so it fires once per
    /// failed fetch no matter how many callers were waiting, and not at all
    /// if every caller walked away before it finished.
    async fn read<T, F, Fut>(&self, context: &'static str, key: CacheKey, op: F) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ResourceError>> + Send + 'static,
    {
        let retry = self.ctx.retry;
        let notifier = self.notifier.clone();
        let result = self
            .ctx
            .cache
            .get_or_fetch(&key, move || async move {
                let result = retry.run(context, op).await;
                if let Err(err) = &result {
                    notifier.failure(context, err);
                }
                result
            })
            .await;
        QueryState::from(result)
    }

    // --- Writes ---

    pub async fn create(&self, payload: &E::Create) -> Result<E::Out, ResourceError> {
        let result = self.client.create(payload).await;
        let success = &self.config.notifications.create_success;
        self.settle("create", None, success, result)
    }

    pub async fn update(&self, id: &E::Id, payload: &E::Update) -> Result<E::Out, ResourceError> {
        let result = self.client.update(id, payload).await;
        let success = &self.config.notifications.update_success;
        self.settle("update", Some(id), success, result)
    }

    /// Soft delete.
    pub async fn delete(&self, id: &E::Id) -> Result<(), ResourceError> {
        let result = self.client.delete(id).await;
        let success = &self.config.notifications.delete_success;
        self.settle("delete", Some(id), success, result)
    }

    /// Invalidates, then notifies; or notifies the failure and hands it back.
    fn settle<T>(
        &self,
        context: &'static str,
        id: Option<&E::Id>,
        success: &str,
        result: Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        match result {
            Ok(value) => {
                self.invalidate_after_write(id);
                info!(resource = %self.config.resource_name, context, "Mutation succeeded");
                self.notifier.success(success);
                Ok(value)
            }
            Err(err) => {
                self.notifier.failure(context, &err);
                Err(err)
            }
        }
    }

    fn invalidate_after_write(&self, id: Option<&E::Id>) {
        let keys = &self.config.cache_keys;
        let cache = &self.ctx.cache;
        cache.invalidate(&keys.list);
        if let Some(id) = id {
            cache.invalidate(&keys.detail(&id.to_string()));
        }
        for prefix in keys.write_coupled() {
            cache.invalidate(prefix);
        }
    }
}

impl<E, H> ResourceQueryFacade<E, WithRestore, H>
where
    E: Resource,
    H: Send + Sync + 'static,
{
    /// Reverses a soft delete.
    pub async fn restore(&self, id: &E::Id) -> Result<E::Out, ResourceError> {
        let result = self.client.restore(id).await;
        let success = &self.config.notifications.restore_success;
        self.settle("restore", Some(id), success, result)
    }
}

impl<E, R> ResourceQueryFacade<E, R, WithHardDelete>
where
    E: Resource,
    R: Send + Sync + 'static,
{
    /// Irreversible delete.
    pub async fn hard_delete(&self, id: &E::Id) -> Result<(), ResourceError> {
        let result = self.client.hard_delete(id).await;
        let success = &self.config.notifications.hard_delete_success;
        self.settle("hard_delete", Some(id), success, result)
    }
}
