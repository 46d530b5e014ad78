use crate::model::Admin;
use resource_framework::{
    ConfigError, FacadeConfig, Notifications, QueryContext, Resource, ResourceClient,
    ResourceQueryFacade, Transport, UrlMap,
};
use std::ops::Deref;
use std::sync::Arc;

pub type AdminFacade = ResourceQueryFacade<Admin>;

/// Operator accounts. Soft delete only.
#[derive(Clone)]
pub struct AdminClient {
    inner: AdminFacade,
}

impl AdminClient {
    pub const LABEL: &'static str = "Admin";

    pub fn urls() -> UrlMap {
        UrlMap::rest("/admins")
    }

    pub fn new(
        transport: Arc<dyn Transport>,
        ctx: QueryContext,
        notifications: Notifications,
    ) -> Result<Self, ConfigError> {
        let client = ResourceClient::new(Self::urls(), transport);
        let config = FacadeConfig::new(Admin::NAME, Self::LABEL).with_notifications(notifications);
        Ok(Self {
            inner: ResourceQueryFacade::new(client, config, ctx)?,
        })
    }
}

impl Deref for AdminClient {
    type Target = AdminFacade;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
