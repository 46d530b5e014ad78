use crate::model::Trial;
use resource_framework::{
    ConfigError, FacadeConfig, Notifications, QueryContext, Resource, ResourceClient,
    ResourceQueryFacade, Transport, UrlMap,
};
use std::ops::Deref;
use std::sync::Arc;

pub type TrialFacade = ResourceQueryFacade<Trial>;

#[derive(Clone)]
pub struct TrialClient {
    inner: TrialFacade,
}

impl TrialClient {
    pub const LABEL: &'static str = "Trial";

    /// Trials are extended with `PUT`.
    pub fn urls() -> UrlMap {
        UrlMap::rest("/trials").with_put_updates()
    }

    pub fn new(
        transport: Arc<dyn Transport>,
        ctx: QueryContext,
        notifications: Notifications,
    ) -> Result<Self, ConfigError> {
        let client = ResourceClient::new(Self::urls(), transport);
        let config = FacadeConfig::new(Trial::NAME, Self::LABEL).with_notifications(notifications);
        Ok(Self {
            inner: ResourceQueryFacade::new(client, config, ctx)?,
        })
    }
}

impl Deref for TrialClient {
    type Target = TrialFacade;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
