// Aggregation & presentation: reduce the dataset to the latest state per repository and
// derive the card and chart views. Pure functions over loaded rows; loading happens in
// the caller.

mod charts;
pub mod format;
mod summary;

use std::collections::BTreeMap;

use crate::config::{DashboardConfig, DashboardVariant};
use crate::models::{DashboardCharts, DashboardSummary, MetricsSnapshot, RepoCard};
use crate::registry::Registry;

pub use charts::ALL_REPOS;
pub use format::{
    NOT_AVAILABLE, format_count, format_optional_count, format_published_at, format_release_version,
};

/// Most recent row per repository, ordered by repository key. When two rows of one
/// repository share a timestamp the later one in file order wins.
pub fn latest_state(rows: &[MetricsSnapshot]) -> Vec<&MetricsSnapshot> {
    let mut latest: BTreeMap<&str, &MetricsSnapshot> = BTreeMap::new();
    for row in rows {
        match latest.get(row.repo.as_str()) {
            Some(current) if current.timestamp > row.timestamp => {}
            _ => {
                latest.insert(row.repo.as_str(), row);
            }
        }
    }
    latest.into_values().collect()
}

/// Registry and link settings needed to turn rows into views.
#[derive(Debug, Clone)]
pub struct Dashboard {
    registry: Registry,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(registry: Registry, config: DashboardConfig) -> Self {
        Self { registry, config }
    }

    pub fn variant(&self) -> DashboardVariant {
        self.config.variant
    }

    pub fn summary(&self, rows: &[MetricsSnapshot]) -> DashboardSummary {
        summary::build_summary(self, rows)
    }

    pub fn charts(&self, rows: &[MetricsSnapshot]) -> DashboardCharts {
        charts::build_charts(self, rows)
    }

    /// Source-host page. Repositories dropped from the registry fall back to the
    /// default organization and their dataset key.
    pub fn github_link(&self, repo: &str) -> String {
        let base = self.config.github_url.trim_end_matches('/');
        match self.registry.get(repo) {
            Some(tracked) => format!("{}/{}/{}", base, tracked.organization, tracked.source_path()),
            None => format!("{}/{}/{}", base, self.config.default_organization, repo),
        }
    }

    /// Package-index page, under the mapped package name when there is one.
    pub fn pypi_link(&self, repo: &str) -> String {
        let package = self
            .registry
            .get(repo)
            .and_then(|r| r.package_identifier())
            .unwrap_or(repo);
        format!(
            "{}/project/{}",
            self.config.pypi_url.trim_end_matches('/'),
            package
        )
    }

    pub(crate) fn excluded_from_download_chart(&self, repo: &str) -> bool {
        self.registry
            .get(repo)
            .is_some_and(|r| r.exclude_from_download_chart)
    }

    pub(crate) fn card(&self, s: &MetricsSnapshot) -> RepoCard {
        RepoCard {
            repo: s.repo.clone(),
            stars: s.stars,
            latest_release_version: format_release_version(&s.latest_release_version),
            published_at: format_published_at(&s.published_at),
            daily_downloads: format_optional_count(s.daily_downloads),
            weekly_downloads: format_optional_count(s.weekly_downloads),
            monthly_downloads: format_optional_count(s.monthly_downloads),
            total_downloads: format_optional_count(s.total_downloads),
            github_link: self.github_link(&s.repo),
            pypi_link: s.has_downloads().then(|| self.pypi_link(&s.repo)),
        }
    }
}
