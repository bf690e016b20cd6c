// Integration tests: dashboard page over HTTP

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::*;
use mqt_dashboard::config::{DashboardConfig, DashboardVariant};
use mqt_dashboard::dashboard::Dashboard;
use mqt_dashboard::dataset_repo::DatasetRepo;
use mqt_dashboard::routes;
use tempfile::TempDir;

async fn dataset_with_scenario() -> (TempDir, Arc<DatasetRepo>) {
    let dir = TempDir::new().unwrap();
    let dataset = Arc::new(DatasetRepo::new(dir.path().join("mqt.csv")));
    dataset.append_snapshots(&scenario_rows()).await.unwrap();
    (dir, dataset)
}

fn test_server(dataset: Arc<DatasetRepo>, variant: DashboardVariant) -> TestServer {
    let dashboard = Dashboard::new(
        test_registry(),
        DashboardConfig {
            variant,
            ..DashboardConfig::default()
        },
    );
    TestServer::new(routes::app(dataset, Arc::new(dashboard)))
}

#[tokio::test]
async fn test_cards_page_shows_latest_state_and_totals() {
    let (_dir, dataset) = dataset_with_scenario().await;
    let server = test_server(dataset, DashboardVariant::Cards);

    let response = server.get("/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("MQT Dashboard"));
    assert!(body.contains("GitHub Stars"));
    assert!(body.contains("200"));
    assert!(body.contains("11.0k"));
    assert!(body.contains("6.0k"));
    assert!(body.contains("N/A"));
    assert!(body.contains("https://github.com/munich-quantum-toolkit/core"));
    assert!(body.contains("https://pypi.org/project/mqt-core"));
    assert!(!body.contains("https://pypi.org/project/mqt-core2"));
    assert!(body.contains("Repositories by Stars"));
    assert!(body.contains("Repositories by Downloads"));
}

#[tokio::test]
async fn test_cards_page_orders_by_stars() {
    let (_dir, dataset) = dataset_with_scenario().await;
    let server = test_server(dataset, DashboardVariant::Cards);

    let body = server.get("/").await.text();
    let by_stars = &body[body.find("Repositories by Stars").unwrap()..];
    let core = by_stars.find("mqt-core<").unwrap();
    let core2 = by_stars.find("mqt-core2<").unwrap();
    assert!(core < core2);
}

#[tokio::test]
async fn test_charts_page_embeds_figures() {
    let (_dir, dataset) = dataset_with_scenario().await;
    let server = test_server(dataset, DashboardVariant::Charts);

    let response = server.get("/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("<table>"));
    assert!(body.contains("plotly"));
    assert!(body.contains("Plotly.newPlot"));
    assert!(body.contains("stars-chart"));
    assert!(body.contains("downloads-chart"));
    assert!(body.contains("combined-chart"));
    assert!(body.contains("All Repos"));
    assert!(body.contains("GitHub Stars over Time"));
    assert!(body.contains("Total Downloads over Time"));
}

#[tokio::test]
async fn test_page_reflects_appended_rows_without_restart() {
    let (_dir, dataset) = dataset_with_scenario().await;
    let server = test_server(dataset.clone(), DashboardVariant::Cards);
    assert!(!server.get("/").await.text().contains("mqt-late"));

    dataset
        .append_snapshots(&[snapshot(ts(T2), "mqt-late", 1, None)])
        .await
        .unwrap();
    let body = server.get("/").await.text();
    assert!(body.contains("mqt-late"));
    // Unregistered repository links through the default organization.
    assert!(body.contains("https://github.com/cda-tum/mqt-late"));
}

#[tokio::test]
async fn test_missing_dataset_is_server_error() {
    let dir = TempDir::new().unwrap();
    let dataset = Arc::new(DatasetRepo::new(dir.path().join("missing.csv")));
    let server = test_server(dataset, DashboardVariant::Cards);

    let response = server.get("/").expect_failure().await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Internal Server Error");
}

#[tokio::test]
async fn test_dynamic_text_is_escaped() {
    let dir = TempDir::new().unwrap();
    let dataset = Arc::new(DatasetRepo::new(dir.path().join("mqt.csv")));
    let mut row = snapshot(ts(T1), "mqt-<b>bold</b>", 1, None);
    row.latest_release_version = "v1 & \"quoted\"".into();
    dataset.append_snapshots(&[row]).await.unwrap();
    let server = test_server(dataset, DashboardVariant::Cards);

    let body = server.get("/").await.text();
    assert!(!body.contains("<b>bold</b>"));
    assert!(body.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(body.contains("v1 &amp; &quot;quoted&quot;"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (_dir, dataset) = dataset_with_scenario().await;
    let server = test_server(dataset, DashboardVariant::Cards);
    let response = server.get("/stats").expect_failure().await;
    response.assert_status_not_found();
}
