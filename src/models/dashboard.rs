// Presentation models: summary cards and chart figures built from the dataset

use chrono::{DateTime, Utc};

/// Latest state of one repository, formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoCard {
    pub repo: String,
    pub stars: u64,
    pub latest_release_version: String,
    /// `"05 March 2024"` or `"No release"`.
    pub published_at: String,
    pub daily_downloads: String,
    pub weekly_downloads: String,
    pub monthly_downloads: String,
    pub total_downloads: String,
    pub github_link: String,
    /// Only set when downloads are tracked for the repository.
    pub pypi_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub sorted_by_stars: Vec<RepoCard>,
    pub sorted_by_downloads: Vec<RepoCard>,
    /// Sum over the latest state only.
    pub total_stars: u64,
    /// Sum over every historical row, formatted.
    pub total_downloads: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesFigure {
    pub title: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// Two series sharing the time axis, each on its own y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DualAxisFigure {
    pub title: String,
    pub left: Series,
    pub right: Series,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCharts {
    /// Latest state, sorted by stars.
    pub table: Vec<RepoCard>,
    pub stars: TimeSeriesFigure,
    pub downloads: TimeSeriesFigure,
    pub combined: DualAxisFigure,
}
