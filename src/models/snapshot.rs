// Per-run metrics row and the fetcher outputs it is assembled from

use chrono::{DateTime, NaiveDateTime, Utc};

/// Placeholder for repositories without a published release.
pub const NO_RELEASE: &str = "No release";

/// Dataset timestamp layout (`2024-03-05 10:00:00.123456+00:00`), microsecond precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f%:z";

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts RFC 3339 (`2024-03-05T10:00:00Z`), the dataset layout with a space separator
/// and optional fraction, and naive date-times (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Source-host figures for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetrics {
    pub stars: u64,
    pub latest_release_version: String,
    pub published_at: String,
}

/// Package-index figures for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadMetrics {
    pub daily: u64,
    pub weekly: u64,
    pub monthly: u64,
    pub total: u64,
}

/// One row of the dataset: one repository at one collection run.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub repo: String,
    pub stars: u64,
    pub latest_release_version: String,
    pub published_at: String,
    pub daily_downloads: Option<u64>,
    pub weekly_downloads: Option<u64>,
    pub monthly_downloads: Option<u64>,
    pub total_downloads: Option<u64>,
}

impl MetricsSnapshot {
    /// `downloads` is `None` for code-only repositories; all four download columns stay absent.
    pub fn new(
        timestamp: DateTime<Utc>,
        repo: impl Into<String>,
        source: SourceMetrics,
        downloads: Option<DownloadMetrics>,
    ) -> Self {
        Self {
            timestamp,
            repo: repo.into(),
            stars: source.stars,
            latest_release_version: source.latest_release_version,
            published_at: source.published_at,
            daily_downloads: downloads.map(|d| d.daily),
            weekly_downloads: downloads.map(|d| d.weekly),
            monthly_downloads: downloads.map(|d| d.monthly),
            total_downloads: downloads.map(|d| d.total),
        }
    }

    pub fn has_downloads(&self) -> bool {
        self.daily_downloads.is_some()
            || self.weekly_downloads.is_some()
            || self.monthly_downloads.is_some()
            || self.total_downloads.is_some()
    }
}
