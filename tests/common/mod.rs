// Shared test helpers
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use mqt_dashboard::config::DashboardConfig;
use mqt_dashboard::dashboard::Dashboard;
use mqt_dashboard::models::*;
use mqt_dashboard::registry::Registry;

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub const T1: i64 = 1_709_632_800; // 2024-03-05 10:00:00 UTC
pub const T2: i64 = 1_710_237_600; // 2024-03-12 10:00:00 UTC

/// Row with downloads when `total_downloads` is set, code-only otherwise.
pub fn snapshot(
    timestamp: DateTime<Utc>,
    repo: &str,
    stars: u64,
    total_downloads: Option<u64>,
) -> MetricsSnapshot {
    MetricsSnapshot {
        timestamp,
        repo: repo.into(),
        stars,
        latest_release_version: "v1.0.0".into(),
        published_at: "2024-03-05T10:00:00Z".into(),
        daily_downloads: total_downloads.map(|_| 10),
        weekly_downloads: total_downloads.map(|_| 70),
        monthly_downloads: total_downloads.map(|_| 300),
        total_downloads,
    }
}

pub fn test_registry() -> Registry {
    Registry::new(vec![
        TrackedRepository::new("mqt-core", "munich-quantum-toolkit")
            .with_source_name("core")
            .packaged(),
        TrackedRepository::new("mqt-core2", "cda-tum"),
    ])
    .unwrap()
}

pub fn test_dashboard() -> Dashboard {
    Dashboard::new(test_registry(), DashboardConfig::default())
}

/// mqt-core: T1 (100 stars, 5000 downloads), T2 (150, 6000); mqt-core2: T1 (50, none).
pub fn scenario_rows() -> Vec<MetricsSnapshot> {
    vec![
        snapshot(ts(T1), "mqt-core", 100, Some(5000)),
        snapshot(ts(T1), "mqt-core2", 50, None),
        snapshot(ts(T2), "mqt-core", 150, Some(6000)),
    ]
}

/// Serve `router` on an ephemeral localhost port; returns the base URL.
pub async fn spawn_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
