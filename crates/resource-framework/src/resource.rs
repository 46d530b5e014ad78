//! # Resource Trait
//!
//! The `Resource` trait binds one logical REST entity (tenant, team, event, ...)
//! to its DTO shapes. The generic [`ResourceClient`](crate::ResourceClient)
//! and [`ResourceQueryFacade`](crate::ResourceQueryFacade) are written once
//! against this trait and reused for every resource.
//!
//! Associated types keep payloads apart: a `TenantCreate` can't be sent to
//! the team endpoints, the compiler rejects it.

use crate::page::PaginatedResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Debug, Display};

/// Binds a resource to its id and DTO types.
///
/// # Provided Methods
/// - [`Resource::normalize_list`] turns a raw list payload into a
///   [`PaginatedResponse`]. The default accepts both the paginated shape and a
///   bare array; override it for backends with a different envelope.
pub trait Resource: Send + Sync + 'static {
    /// Root cache-key segment and log label (e.g. `"tenants"`).
    const NAME: &'static str;

    /// Identifier as it appears in URLs.
    type Id: Clone + Display + Debug + Send + Sync + 'static;

    /// Payload for `create`.
    type Create: Serialize + Debug + Send + Sync;

    /// Payload for `update`.
    type Update: Serialize + Debug + Send + Sync;

    /// Representation returned by the server.
    type Out: DeserializeOwned + Clone + Debug + Send + Sync + 'static;

    /// Decodes a list response for the requested page.
    fn normalize_list(
        raw: Value,
        page: u32,
        page_size: u32,
    ) -> Result<PaginatedResponse<Self::Out>, serde_json::Error> {
        PaginatedResponse::normalize(raw, page, page_size)
    }
}
