// Time-series figures

mod common;

use common::*;
use mqt_dashboard::config::DashboardConfig;
use mqt_dashboard::dashboard::{ALL_REPOS, Dashboard};
use mqt_dashboard::models::*;
use mqt_dashboard::registry::Registry;

fn values(series: &Series) -> Vec<f64> {
    series.points.iter().map(|p| p.value).collect()
}

#[test]
fn stars_figure_has_all_repos_first_then_each_repo() {
    let charts = test_dashboard().charts(&scenario_rows());
    let names: Vec<&str> = charts.stars.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![ALL_REPOS, "mqt-core", "mqt-core2"]);
    assert_eq!(charts.stars.title, "GitHub Stars over Time");
}

#[test]
fn stars_all_repos_sums_per_timestamp() {
    let charts = test_dashboard().charts(&scenario_rows());
    let all = &charts.stars.series[0];
    assert_eq!(all.points[0].timestamp, ts(T1));
    assert_eq!(all.points[1].timestamp, ts(T2));
    // T1: 100 + 50; T2: only mqt-core was collected.
    assert_eq!(values(all), vec![150.0, 150.0]);
    assert_eq!(values(&charts.stars.series[1]), vec![100.0, 150.0]);
    assert_eq!(values(&charts.stars.series[2]), vec![50.0]);
}

#[test]
fn downloads_figure_skips_rows_without_totals() {
    let charts = test_dashboard().charts(&scenario_rows());
    let names: Vec<&str> = charts
        .downloads
        .series
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec![ALL_REPOS, "mqt-core"]);
    assert_eq!(values(&charts.downloads.series[0]), vec![5000.0, 6000.0]);
}

#[test]
fn downloads_figure_skips_excluded_repositories() {
    let registry = Registry::new(vec![
        TrackedRepository::new("mqt-core", "munich-quantum-toolkit").packaged(),
        TrackedRepository {
            exclude_from_download_chart: true,
            ..TrackedRepository::new("ddvis", "munich-quantum-toolkit").packaged()
        },
    ])
    .unwrap();
    let dashboard = Dashboard::new(registry, DashboardConfig::default());
    let rows = vec![
        snapshot(ts(T1), "mqt-core", 10, Some(1000)),
        snapshot(ts(T1), "ddvis", 20, Some(900_000)),
    ];
    let charts = dashboard.charts(&rows);
    let names: Vec<&str> = charts
        .downloads
        .series
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec![ALL_REPOS, "mqt-core"]);
    assert_eq!(values(&charts.downloads.series[0]), vec![1000.0]);
    // Stars still include the excluded repository.
    assert_eq!(values(&charts.stars.series[0]), vec![30.0]);
}

#[test]
fn same_repo_twice_at_one_timestamp_is_summed() {
    let rows = vec![
        snapshot(ts(T1), "mqt-core", 10, Some(1)),
        snapshot(ts(T1), "mqt-core", 5, Some(2)),
    ];
    let charts = test_dashboard().charts(&rows);
    assert_eq!(values(&charts.stars.series[1]), vec![15.0]);
    assert_eq!(values(&charts.downloads.series[1]), vec![3.0]);
}

#[test]
fn combined_figure_pairs_totals() {
    let charts = test_dashboard().charts(&scenario_rows());
    assert_eq!(charts.combined.left.name, "Total Stars");
    assert_eq!(charts.combined.right.name, "Total Downloads");
    assert_eq!(values(&charts.combined.left), vec![150.0, 150.0]);
    assert_eq!(values(&charts.combined.right), vec![5000.0, 6000.0]);
}

#[test]
fn table_matches_summary_sorted_by_stars() {
    let dashboard = test_dashboard();
    let rows = scenario_rows();
    assert_eq!(
        dashboard.charts(&rows).table,
        dashboard.summary(&rows).sorted_by_stars
    );
}

#[test]
fn empty_dataset_gives_empty_totals_series() {
    let charts = test_dashboard().charts(&[]);
    assert_eq!(charts.stars.series.len(), 1);
    assert!(charts.stars.series[0].points.is_empty());
    assert!(charts.combined.right.points.is_empty());
}
