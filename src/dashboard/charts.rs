// Time-series figures over the whole history.
// Rows are grouped by (timestamp, repo) and summed; an "All Repos" series sums across
// repositories per timestamp.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::Dashboard;
use crate::models::{
    DashboardCharts, DualAxisFigure, MetricsSnapshot, Series, SeriesPoint, TimeSeriesFigure,
};

pub const ALL_REPOS: &str = "All Repos";

pub(super) fn build_charts(dashboard: &Dashboard, rows: &[MetricsSnapshot]) -> DashboardCharts {
    let stars = stars_figure(rows);
    let downloads = downloads_figure(dashboard, rows);
    let combined = combined_figure(&stars, &downloads);
    DashboardCharts {
        table: dashboard.summary(rows).sorted_by_stars,
        stars,
        downloads,
        combined,
    }
}

pub(super) fn stars_figure(rows: &[MetricsSnapshot]) -> TimeSeriesFigure {
    TimeSeriesFigure {
        title: "GitHub Stars over Time".into(),
        y_label: "Stars".into(),
        series: grouped_series(
            rows.iter()
                .map(|s| (s.timestamp, s.repo.as_str(), s.stars as f64)),
        ),
    }
}

/// Rows without a download figure and repositories flagged
/// `exclude_from_download_chart` are left out.
pub(super) fn downloads_figure(dashboard: &Dashboard, rows: &[MetricsSnapshot]) -> TimeSeriesFigure {
    TimeSeriesFigure {
        title: "Total Downloads over Time".into(),
        y_label: "Downloads".into(),
        series: grouped_series(rows.iter().filter_map(|s| {
            if dashboard.excluded_from_download_chart(&s.repo) {
                return None;
            }
            s.total_downloads
                .map(|d| (s.timestamp, s.repo.as_str(), d as f64))
        })),
    }
}

/// "All Repos" stars (left axis) against "All Repos" downloads (right axis).
pub(super) fn combined_figure(
    stars: &TimeSeriesFigure,
    downloads: &TimeSeriesFigure,
) -> DualAxisFigure {
    DualAxisFigure {
        title: "Total Stars and Downloads over Time".into(),
        left: renamed_total(stars, "Total Stars"),
        right: renamed_total(downloads, "Total Downloads"),
    }
}

fn renamed_total(figure: &TimeSeriesFigure, name: &str) -> Series {
    let points = figure
        .series
        .iter()
        .find(|s| s.name == ALL_REPOS)
        .map(|s| s.points.clone())
        .unwrap_or_default();
    Series {
        name: name.to_string(),
        points,
    }
}

/// "All Repos" first, then one series per repository in name order; points in time order.
fn grouped_series<'a>(
    values: impl IntoIterator<Item = (DateTime<Utc>, &'a str, f64)>,
) -> Vec<Series> {
    let mut per_repo: BTreeMap<&str, BTreeMap<DateTime<Utc>, f64>> = BTreeMap::new();
    let mut totals: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
    for (ts, repo, value) in values {
        *per_repo.entry(repo).or_default().entry(ts).or_insert(0.0) += value;
        *totals.entry(ts).or_insert(0.0) += value;
    }
    let mut series = Vec::with_capacity(per_repo.len() + 1);
    series.push(to_series(ALL_REPOS, totals));
    series.extend(
        per_repo
            .into_iter()
            .map(|(repo, points)| to_series(repo, points)),
    );
    series
}

fn to_series(name: &str, points: BTreeMap<DateTime<Utc>, f64>) -> Series {
    Series {
        name: name.to_string(),
        points: points
            .into_iter()
            .map(|(timestamp, value)| SeriesPoint { timestamp, value })
            .collect(),
    }
}
