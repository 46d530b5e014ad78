use crate::model::Group;
use resource_framework::urls::{NoRestore, WithHardDelete};
use resource_framework::{
    ConfigError, FacadeConfig, Notifications, QueryContext, Resource, ResourceClient,
    ResourceQueryFacade, Transport, UrlMap,
};
use std::ops::Deref;
use std::sync::Arc;

pub type GroupFacade = ResourceQueryFacade<Group, NoRestore, WithHardDelete>;

/// Groups have no archive: `hard_delete` is the only way to remove one.
#[derive(Clone)]
pub struct GroupClient {
    inner: GroupFacade,
}

impl GroupClient {
    pub const LABEL: &'static str = "Group";

    pub fn urls() -> UrlMap<NoRestore, WithHardDelete> {
        UrlMap::rest("/groups").with_hard_delete(|id| format!("/groups/{id}/permanent"))
    }

    pub fn new(
        transport: Arc<dyn Transport>,
        ctx: QueryContext,
        notifications: Notifications,
    ) -> Result<Self, ConfigError> {
        let client = ResourceClient::new(Self::urls(), transport);
        let config = FacadeConfig::new(Group::NAME, Self::LABEL).with_notifications(notifications);
        Ok(Self {
            inner: ResourceQueryFacade::new(client, config, ctx)?,
        })
    }
}

impl Deref for GroupClient {
    type Target = GroupFacade;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
