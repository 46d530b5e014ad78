use crate::model::Team;
use resource_framework::urls::{NoHardDelete, WithRestore};
use resource_framework::{
    ConfigError, FacadeConfig, ListParams, Notifications, PaginatedResponse, QueryContext,
    QueryState, Resource, ResourceClient, ResourceQueryFacade, Transport, UrlMap,
};
use std::ops::Deref;
use std::sync::Arc;
use tracing::instrument;

pub type TeamFacade = ResourceQueryFacade<Team, WithRestore, NoHardDelete>;

#[derive(Clone)]
pub struct TeamClient {
    inner: TeamFacade,
}

impl TeamClient {
    pub const LABEL: &'static str = "Team";

    pub fn urls() -> UrlMap<WithRestore, NoHardDelete> {
        UrlMap::rest("/teams").with_restore(|id| format!("/teams/{id}/restore"))
    }

    pub fn new(
        transport: Arc<dyn Transport>,
        ctx: QueryContext,
        notifications: Notifications,
    ) -> Result<Self, ConfigError> {
        let client = ResourceClient::new(Self::urls(), transport);
        let config = FacadeConfig::new(Team::NAME, Self::LABEL).with_notifications(notifications);
        Ok(Self {
            inner: ResourceQueryFacade::new(client, config, ctx)?,
        })
    }

    /// Teams belonging to one group.
    #[instrument(skip(self))]
    pub async fn in_group(
        &self,
        group_id: &str,
        page: u32,
        page_size: u32,
    ) -> QueryState<PaginatedResponse<Team>> {
        let params =
            ListParams::new(page, page_size).with_field("group_id", Some(group_id.to_string()));
        self.inner.list(&params).await
    }
}

impl Deref for TeamClient {
    type Target = TeamFacade;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
