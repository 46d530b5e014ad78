//! # Resource Framework
//!
//! Building blocks for talking to a JSON REST backend that exposes many
//! resources of the same shape (tenants, teams, events, ...). The per-resource
//! plumbing is written **once**, generically, and every resource reuses it.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Type Layer** ([`Resource`]) - binds a resource to its id and DTOs
//! 2. **Client Layer** ([`ResourceClient`]) - URL shaping, parameter
//!    sanitization, pagination normalization, error classification
//! 3. **Facade Layer** ([`ResourceQueryFacade`]) - cached and de-duplicated
//!    reads, retry, cache invalidation after writes, user notifications
//!
//! Both outer layers sit on two seams: a [`Transport`] that sends requests
//! and a [`NotificationSink`] that receives user-facing messages.
//!
//! ## Quick Example
//!
//! ```rust
//! use resource_framework::mock::MockTransport;
//! use resource_framework::{
//!     FacadeConfig, ListParams, QueryContext, Resource, ResourceClient, ResourceQueryFacade,
//!     UrlMap,
//! };
//! use http::Method;
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, Deserialize)]
//! struct Place { id: String, name: String }
//! #[derive(Debug, Serialize)] struct PlaceCreate { name: String }
//! #[derive(Debug, Serialize)] struct PlaceUpdate { name: Option<String> }
//!
//! struct Places;
//! impl Resource for Places {
//!     const NAME: &'static str = "places";
//!     type Id = String;
//!     type Create = PlaceCreate;
//!     type Update = PlaceUpdate;
//!     type Out = Place;
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect(Method::GET, "/api/places")
//!         .return_ok(json!([{ "id": "p1", "name": "Lisbon" }]));
//!
//!     let client = ResourceClient::<Places>::new(UrlMap::rest("/api/places"), mock.shared());
//!     let places = ResourceQueryFacade::new(
//!         client,
//!         FacadeConfig::new(Places::NAME, "Place"),
//!         QueryContext::default(),
//!     )
//!     .unwrap();
//!
//!     let state = places.list(&ListParams::new(1, 20)).await;
//!     let page = state.into_result().unwrap();
//!     assert_eq!(page.count, 1);
//!     assert_eq!(page.data[0].name, "Lisbon");
//! }
//! ```
//!
//! ## Capabilities in the Type
//!
//! Restore and hard delete exist only for resources whose [`UrlMap`] was
//! built with [`UrlMap::with_restore`] / [`UrlMap::with_hard_delete`]. The
//! methods are missing otherwise, so calling them is a compile error rather
//! than a runtime failure.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockTransport`](mock::MockTransport), an
//! in-memory transport with a fluent expectation API.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod facade;
pub mod http_transport;
pub mod mock;
pub mod notify;
pub mod page;
pub mod params;
pub mod query;
pub mod resource;
pub mod retry;
pub mod tracing;
pub mod transport;
pub mod urls;

// Re-export core types for convenience
pub use cache::{CacheKey, CacheStats, QueryCache};
pub use client::ResourceClient;
pub use config::{CacheKeys, FacadeConfig, Notifications};
pub use error::{ConfigError, ResourceError, TransportError};
pub use facade::{QueryContext, ResourceQueryFacade};
pub use http_transport::HttpTransport;
pub use notify::{Notification, NotificationKind, NotificationSink, SessionListener};
pub use page::PaginatedResponse;
pub use params::ListParams;
pub use query::{QueryState, QueryStatus};
pub use resource::Resource;
pub use retry::RetryPolicy;
pub use transport::{Transport, TransportRequest, TransportResponse};
pub use urls::UrlMap;
