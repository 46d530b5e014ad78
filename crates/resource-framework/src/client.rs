//! # Generic Client
//!
//! This module defines [`ResourceClient`], the typed adapter between one
//! [`Resource`] and its REST endpoints.

use crate::error::ResourceError;
use crate::page::PaginatedResponse;
use crate::params::ListParams;
use crate::resource::Resource;
use crate::transport::{Transport, TransportRequest};
use crate::urls::{NoHardDelete, NoRestore, UrlMap, WithHardDelete, WithRestore};
use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// A type-safe REST client for one resource.
///
/// ## ResourceClient
///
/// `ResourceClient<E, R, H>` maps the logical operations of resource `E` onto
/// the paths in its [`UrlMap`] and sends them through a shared [`Transport`].
///
/// * **Cloneable** – holds two `Arc`s, cloning is cheap.
/// * **Capability-typed** – `restore` exists only when `R = WithRestore`,
///   `hard_delete` only when `H = WithHardDelete`.
/// * **Never silent** – every failure comes back as a classified
///   [`ResourceError`] carrying the operation name and the original cause.
pub struct ResourceClient<E: Resource, R = NoRestore, H = NoHardDelete> {
    urls: Arc<UrlMap<R, H>>,
    transport: Arc<dyn Transport>,
    _resource: PhantomData<fn() -> E>,
}

impl<E: Resource, R, H> Clone for ResourceClient<E, R, H> {
    fn clone(&self) -> Self {
        Self {
            urls: self.urls.clone(),
            transport: self.transport.clone(),
            _resource: PhantomData,
        }
    }
}

impl<E: Resource, R, H> ResourceClient<E, R, H> {
    pub fn new(urls: UrlMap<R, H>, transport: Arc<dyn Transport>) -> Self {
        Self {
            urls: Arc::new(urls),
            transport,
            _resource: PhantomData,
        }
    }

    pub fn urls(&self) -> &UrlMap<R, H> {
        &self.urls
    }

    /// Fetches one page of the collection.
    #[instrument(skip(self, params), fields(resource = E::NAME, page = params.page, page_size = params.page_size))]
    pub async fn list(
        &self,
        params: &ListParams,
    ) -> Result<PaginatedResponse<E::Out>, ResourceError> {
        params.validate()?;
        let request =
            TransportRequest::new(Method::GET, self.urls.list()).with_query(params.sanitized());
        let raw = self.send("list", request).await?;
        E::normalize_list(raw, params.page, params.page_size).map_err(|e| decode_error("list", e))
    }

    #[instrument(skip(self), fields(resource = E::NAME))]
    pub async fn get_by_id(&self, id: &E::Id) -> Result<E::Out, ResourceError> {
        let id = checked_id("get", id)?;
        let raw = self
            .send("get", TransportRequest::new(Method::GET, self.urls.detail(&id)))
            .await?;
        decode("get", raw)
    }

    #[instrument(skip(self), fields(resource = E::NAME))]
    pub async fn create(&self, payload: &E::Create) -> Result<E::Out, ResourceError> {
        let body = encode("create", payload)?;
        let request = TransportRequest::new(Method::POST, self.urls.create()).with_body(body);
        let raw = self.send("create", request).await?;
        decode("create", raw)
    }

    #[instrument(skip(self), fields(resource = E::NAME))]
    pub async fn update(&self, id: &E::Id, payload: &E::Update) -> Result<E::Out, ResourceError> {
        let id = checked_id("update", id)?;
        let body = encode("update", payload)?;
        let request = TransportRequest::new(self.urls.update_method().clone(), self.urls.update(&id))
            .with_body(body);
        let raw = self.send("update", request).await?;
        decode("update", raw)
    }

    /// Soft delete: the record is archived server-side, not destroyed.
    #[instrument(skip(self), fields(resource = E::NAME))]
    pub async fn delete(&self, id: &E::Id) -> Result<(), ResourceError> {
        let id = checked_id("delete", id)?;
        self.send("delete", TransportRequest::new(Method::DELETE, self.urls.delete(&id)))
            .await?;
        Ok(())
    }

    /// `GET` on a named endpoint registered with [`UrlMap::with_endpoint`].
    #[instrument(skip(self), fields(resource = E::NAME))]
    pub async fn fetch_endpoint<T: DeserializeOwned>(
        &self,
        name: &str,
        arg: &str,
    ) -> Result<T, ResourceError> {
        let Some(url) = self.urls.endpoint(name, arg) else {
            return Err(ResourceError::validation(
                "endpoint",
                format!("no endpoint named `{name}` for {}", E::NAME),
            ));
        };
        let raw = self
            .send("endpoint", TransportRequest::new(Method::GET, url))
            .await?;
        decode("endpoint", raw)
    }

    async fn send(
        &self,
        context: &'static str,
        request: TransportRequest,
    ) -> Result<Value, ResourceError> {
        debug!(resource = E::NAME, context, method = %request.method, url = %request.url, "Sending request");
        match self.transport.send(request).await {
            Ok(response) => Ok(response.data),
            Err(cause) => {
                let err = ResourceError::from_transport(context, cause);
                warn!(resource = E::NAME, context, error = %err, "Request failed");
                Err(err)
            }
        }
    }
}

impl<E: Resource, H> ResourceClient<E, WithRestore, H> {
    /// Reverses a soft delete.
    #[instrument(skip(self), fields(resource = E::NAME))]
    pub async fn restore(&self, id: &E::Id) -> Result<E::Out, ResourceError> {
        let id = checked_id("restore", id)?;
        let raw = self
            .send("restore", TransportRequest::new(Method::POST, self.urls.restore(&id)))
            .await?;
        decode("restore", raw)
    }
}

impl<E: Resource, R> ResourceClient<E, R, WithHardDelete> {
    /// Permanently removes the record.
    #[instrument(skip(self), fields(resource = E::NAME))]
    pub async fn hard_delete(&self, id: &E::Id) -> Result<(), ResourceError> {
        let id = checked_id("hard_delete", id)?;
        self.send(
            "hard_delete",
            TransportRequest::new(Method::DELETE, self.urls.hard_delete(&id)),
        )
        .await?;
        Ok(())
    }
}

/// Renders `id` for a URL, rejecting blank ids before anything is sent.
pub(crate) fn checked_id<I: std::fmt::Display>(
    operation: &'static str,
    id: &I,
) -> Result<String, ResourceError> {
    let id = id.to_string();
    if id.trim().is_empty() {
        return Err(ResourceError::validation(operation, "id must not be empty"));
    }
    Ok(id)
}

fn encode<T: Serialize>(operation: &'static str, payload: &T) -> Result<Value, ResourceError> {
    serde_json::to_value(payload).map_err(|e| {
        ResourceError::validation(operation, format!("payload could not be serialized: {e}"))
    })
}

fn decode<T: DeserializeOwned>(context: &'static str, raw: Value) -> Result<T, ResourceError> {
    serde_json::from_value(raw).map_err(|e| decode_error(context, e))
}

fn decode_error(context: &'static str, e: serde_json::Error) -> ResourceError {
    ResourceError::Fetch {
        context,
        cause: crate::error::TransportError::Decode(e.to_string()),
    }
}
