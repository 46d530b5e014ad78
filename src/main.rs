//! Demo: lists the first page of tenants and prints every notification the
//! dashboard emits along the way.

use admin_dashboard::{Dashboard, DashboardConfig};
use anyhow::Context;
use resource_framework::notify::ChannelSink;
use resource_framework::tracing::setup_tracing;
use resource_framework::ListParams;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = DashboardConfig::load(path.as_deref()).context("loading configuration")?;

    let (sink, mut notifications) = ChannelSink::new();
    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            println!("{notification}");
        }
    });

    let dashboard = Dashboard::builder(config)
        .with_sink(Arc::new(sink))
        .build()
        .context("building dashboard")?;

    let span = tracing::info_span!("tenant_overview");
    async {
        let state = dashboard.tenants.list(&ListParams::new(1, 20)).await;
        match state.into_result() {
            Ok(page) => {
                info!(count = page.count, total_pages = page.total_pages, "Tenants loaded");
                for tenant in &page.data {
                    println!("{:<24} {:<32} {}", tenant.id, tenant.name, tenant.domain);
                }
                if let Some(first) = page.data.first() {
                    let detail = dashboard.tenants.get_by_id(&first.id).await;
                    info!(status = ?detail.status, "First tenant detail loaded");
                }
            }
            Err(e) => error!(error = %e, "Could not load tenants"),
        }
    }
    .instrument(span)
    .await;

    dashboard.shutdown();
    printer.await.context("notification printer")?;

    info!("Done");
    Ok(())
}
