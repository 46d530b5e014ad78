//! # Tenant Client
//!
//! Wraps the generic facade for tenants. Tenants support the full delete
//! lifecycle: soft delete, restore and permanent removal.

use crate::model::Tenant;
use resource_framework::urls::{WithHardDelete, WithRestore};
use resource_framework::{
    ConfigError, FacadeConfig, ListParams, Notifications, PaginatedResponse, QueryContext,
    QueryState, Resource, ResourceClient, ResourceQueryFacade, Transport, UrlMap,
};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, instrument};

pub type TenantFacade = ResourceQueryFacade<Tenant, WithRestore, WithHardDelete>;

#[derive(Clone)]
pub struct TenantClient {
    inner: TenantFacade,
}

impl TenantClient {
    pub const LABEL: &'static str = "Tenant";

    pub fn urls() -> UrlMap<WithRestore, WithHardDelete> {
        UrlMap::rest("/tenants")
            .with_restore(|id| format!("/tenants/{id}/restore"))
            .with_hard_delete(|id| format!("/tenants/{id}/permanent"))
    }

    pub fn new(
        transport: Arc<dyn Transport>,
        ctx: QueryContext,
        notifications: Notifications,
    ) -> Result<Self, ConfigError> {
        let client = ResourceClient::new(Self::urls(), transport);
        let config = FacadeConfig::new(Tenant::NAME, Self::LABEL).with_notifications(notifications);
        Ok(Self {
            inner: ResourceQueryFacade::new(client, config, ctx)?,
        })
    }

    /// Tenants whose name or domain matches `term`.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        term: &str,
        page: u32,
        page_size: u32,
    ) -> QueryState<PaginatedResponse<Tenant>> {
        debug!("Searching tenants");
        self.inner
            .list(&ListParams::new(page, page_size).with_filter(term))
            .await
    }
}

impl Deref for TenantClient {
    type Target = TenantFacade;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
