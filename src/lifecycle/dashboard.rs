use crate::clients::{AdminClient, EventClient, GroupClient, TeamClient, TenantClient, TrialClient};
use crate::error::DashboardError;
use crate::lifecycle::DashboardConfig;
use crate::model::{Admin, Event, Group, Team, Tenant, Trial};
use resource_framework::notify::{LogSessionListener, TracingSink};
use resource_framework::{
    CacheStats, HttpTransport, NotificationSink, QueryCache, QueryContext, Resource,
    SessionListener, Transport,
};
use std::sync::Arc;
use tracing::{debug, info};

/// The wired application: one client per resource over a shared cache,
/// transport, notification sink and session hook.
///
/// # Example
///
/// ```ignore
/// let config = DashboardConfig::load(None)?;
/// let (sink, mut notifications) = ChannelSink::new();
/// let dashboard = Dashboard::builder(config).with_sink(Arc::new(sink)).build()?;
///
/// let page = dashboard.tenants.list(&ListParams::new(1, 20)).await;
///
/// dashboard.shutdown();
/// ```
pub struct Dashboard {
    pub tenants: TenantClient,
    pub admins: AdminClient,
    pub groups: GroupClient,
    pub teams: TeamClient,
    pub trials: TrialClient,
    pub events: EventClient,
    cache: QueryCache,
}

pub struct DashboardBuilder {
    config: DashboardConfig,
    transport: Option<Arc<dyn Transport>>,
    sink: Arc<dyn NotificationSink>,
    session: Arc<dyn SessionListener>,
}

impl DashboardBuilder {
    /// Replaces the HTTP transport built from the config.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_session_listener(mut self, session: Arc<dyn SessionListener>) -> Self {
        self.session = session;
        self
    }

    /// Creates the shared services, then one client per resource.
    pub fn build(self) -> Result<Dashboard, DashboardError> {
        let config = self.config;
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut http = HttpTransport::with_timeout(&config.base_url, config.timeout())?;
                if let Some(token) = &config.bearer_token {
                    http = http.with_bearer_token(token);
                }
                Arc::new(http)
            }
        };

        let cache = QueryCache::new();
        let ctx = QueryContext::new(cache.clone(), self.sink)
            .with_session_listener(self.session)
            .with_retry(config.retry);

        let dashboard = Dashboard {
            tenants: TenantClient::new(
                transport.clone(),
                ctx.clone(),
                config.notifications_for(Tenant::NAME, TenantClient::LABEL),
            )?,
            admins: AdminClient::new(
                transport.clone(),
                ctx.clone(),
                config.notifications_for(Admin::NAME, AdminClient::LABEL),
            )?,
            groups: GroupClient::new(
                transport.clone(),
                ctx.clone(),
                config.notifications_for(Group::NAME, GroupClient::LABEL),
            )?,
            teams: TeamClient::new(
                transport.clone(),
                ctx.clone(),
                config.notifications_for(Team::NAME, TeamClient::LABEL),
            )?,
            trials: TrialClient::new(
                transport.clone(),
                ctx.clone(),
                config.notifications_for(Trial::NAME, TrialClient::LABEL),
            )?,
            events: EventClient::new(
                transport,
                ctx,
                config.notifications_for(Event::NAME, EventClient::LABEL),
            )?,
            cache,
        };

        info!(base_url = %config.base_url, "Dashboard ready");
        Ok(dashboard)
    }
}

impl Dashboard {
    pub fn builder(config: DashboardConfig) -> DashboardBuilder {
        DashboardBuilder {
            config,
            transport: None,
            sink: Arc::new(TracingSink),
            session: Arc::new(LogSessionListener),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Forgets every cached read, e.g. after a sign-out.
    pub fn reset_cache(&self) {
        debug!(entries = self.cache.len(), "Resetting cache");
        self.cache.clear();
    }

    /// Drops every client and with them their handles on the sink, so a
    /// channel-backed sink sees its sender side close.
    pub fn shutdown(self) -> CacheStats {
        let stats = self.cache.stats();
        self.cache.clear();
        info!(
            hits = stats.hits,
            fetches = stats.fetches,
            joins = stats.joins,
            invalidations = stats.invalidations,
            "Dashboard shut down"
        );
        stats
    }
}
