//! # Event Client
//!
//! Events carry a second read besides the record itself: the live status at
//! `/events/{id}/status`. It is cached under `[events, status, id]` and that
//! family is dropped on every successful event mutation, alongside the list
//! and detail keys.

use crate::model::{Event, EventId, EventStatus};
use resource_framework::urls::{NoHardDelete, WithRestore};
use resource_framework::{
    CacheKey, CacheKeys, ConfigError, FacadeConfig, Notifications, QueryContext, QueryState,
    Resource, ResourceClient, ResourceQueryFacade, Transport, UrlMap,
};
use std::ops::Deref;
use std::sync::Arc;
use tracing::instrument;

pub type EventFacade = ResourceQueryFacade<Event, WithRestore, NoHardDelete>;

const STATUS: &str = "status";

#[derive(Clone)]
pub struct EventClient {
    inner: EventFacade,
}

impl EventClient {
    pub const LABEL: &'static str = "Event";

    pub fn urls() -> UrlMap<WithRestore, NoHardDelete> {
        UrlMap::rest("/events")
            .with_restore(|id| format!("/events/{id}/restore"))
            .with_endpoint(STATUS, |id| format!("/events/{id}/status"))
    }

    pub fn cache_keys() -> CacheKeys {
        CacheKeys::for_resource(Event::NAME).with_additional(
            STATUS,
            CacheKey::new(Event::NAME).with(STATUS),
            true,
        )
    }

    pub fn new(
        transport: Arc<dyn Transport>,
        ctx: QueryContext,
        notifications: Notifications,
    ) -> Result<Self, ConfigError> {
        let client = ResourceClient::new(Self::urls(), transport);
        let config = FacadeConfig::new(Event::NAME, Self::LABEL)
            .with_cache_keys(Self::cache_keys())
            .with_notifications(notifications);
        Ok(Self {
            inner: ResourceQueryFacade::new(client, config, ctx)?,
        })
    }

    /// Live status of one event, cached until the next event mutation.
    #[instrument(skip(self))]
    pub async fn status(&self, id: &EventId) -> QueryState<EventStatus> {
        self.inner.query_additional(STATUS, id).await
    }
}

impl Deref for EventClient {
    type Target = EventFacade;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
