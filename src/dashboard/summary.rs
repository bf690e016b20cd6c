// Summary cards: latest state per repository, sorted two ways, plus totals

use super::Dashboard;
use super::format::format_count;
use crate::models::{DashboardSummary, MetricsSnapshot, RepoCard};

pub(super) fn build_summary(dashboard: &Dashboard, rows: &[MetricsSnapshot]) -> DashboardSummary {
    let latest = super::latest_state(rows);

    // Sort on the raw counts before formatting; repositories without downloads go last.
    let mut by_downloads: Vec<(&MetricsSnapshot, RepoCard)> =
        latest.iter().map(|s| (*s, dashboard.card(s))).collect();
    by_downloads.sort_by(|(a, _), (b, _)| b.total_downloads.cmp(&a.total_downloads));

    let mut by_stars = by_downloads.clone();
    by_stars.sort_by(|(a, _), (b, _)| b.stars.cmp(&a.stars));

    let total_stars: u64 = latest.iter().map(|s| s.stars).sum();
    // Every historical row, superseded ones included.
    let total_downloads: u64 = rows.iter().filter_map(|s| s.total_downloads).sum();

    DashboardSummary {
        sorted_by_stars: by_stars.into_iter().map(|(_, card)| card).collect(),
        sorted_by_downloads: by_downloads.into_iter().map(|(_, card)| card).collect(),
        total_stars,
        total_downloads: format_count(total_downloads as f64),
    }
}
