//! The dashboard over its real HTTP transport, against a local mock server.

use admin_dashboard::model::{GroupCreate, Tenant};
use admin_dashboard::{Dashboard, DashboardConfig};
use httpmock::prelude::*;
use resource_framework::{ListParams, RetryPolicy};
use serde_json::json;

fn config(server: &MockServer) -> DashboardConfig {
    DashboardConfig {
        base_url: server.base_url(),
        bearer_token: Some("test-token".into()),
        timeout_ms: 2_000,
        retry: RetryPolicy::immediate(2),
        ..DashboardConfig::default()
    }
}

#[tokio::test]
async fn test_list_sends_sanitized_query_and_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/tenants")
                .query_param("page", "2")
                .query_param("page_size", "5")
                .query_param("filter", "acme")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!([
                { "id": "t1", "name": "Acme", "domain": "acme.example.com" },
                { "id": "t2", "name": "Acme EU", "domain": "eu.acme.example.com" }
            ]));
        })
        .await;

    let dashboard = Dashboard::builder(config(&server)).build().unwrap();
    let page = dashboard
        .tenants
        .list(&ListParams::new(2, 5).with_filter("acme").with_sort("  "))
        .await
        .into_result()
        .unwrap();

    assert_eq!(page.count, 2);
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 1);
    let names: Vec<&str> = page.data.iter().map(|t: &Tenant| t.name.as_str()).collect();
    assert_eq!(names, ["Acme", "Acme EU"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/admins/missing");
            then.status(404).json_body(json!({ "error": "Admin not found" }));
        })
        .await;

    let dashboard = Dashboard::builder(config(&server)).build().unwrap();
    let state = dashboard.admins.get_by_id(&"missing".to_string()).await;

    let err = state.error.unwrap();
    assert!(!err.is_transient());
    assert_eq!(err.user_message(), "Admin not found");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_posts_payload() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/groups")
                .json_body(json!({ "tenant_id": "t1", "name": "Design" }));
            then.status(201).json_body(json!({
                "id": "g7",
                "tenant_id": "t1",
                "name": "Design"
            }));
        })
        .await;

    let dashboard = Dashboard::builder(config(&server)).build().unwrap();
    let group = dashboard
        .groups
        .create(&GroupCreate {
            tenant_id: "t1".into(),
            name: "Design".into(),
            description: None,
        })
        .await
        .unwrap();

    assert_eq!(group.id, "g7");
    assert_eq!(group.member_count, 0);
    mock.assert_async().await;
}
