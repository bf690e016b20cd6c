// CSV row layout. Files written by the earlier collector are read as-is:
// leading unnamed index column, space-separated timestamps, float-formatted counts
// (`123.0`) and empty cells for missing values. Text cells are kept verbatim, empty ones
// included, so rewriting the file never changes a stored row.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::models::{MetricsSnapshot, format_timestamp, parse_timestamp};

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CsvRow {
    #[serde(rename = "", default)]
    index: Option<String>,
    timestamp: String,
    repo: String,
    stars: String,
    latest_release_version: String,
    published_at: String,
    daily_downloads: String,
    weekly_downloads: String,
    monthly_downloads: String,
    total_downloads: String,
}

impl CsvRow {
    pub(super) fn from_snapshot(index: usize, s: &MetricsSnapshot) -> Self {
        Self {
            index: Some(index.to_string()),
            timestamp: format_timestamp(&s.timestamp),
            repo: s.repo.clone(),
            stars: s.stars.to_string(),
            latest_release_version: s.latest_release_version.clone(),
            published_at: s.published_at.clone(),
            daily_downloads: count_cell(s.daily_downloads),
            weekly_downloads: count_cell(s.weekly_downloads),
            monthly_downloads: count_cell(s.monthly_downloads),
            total_downloads: count_cell(s.total_downloads),
        }
    }

    pub(super) fn into_snapshot(self) -> anyhow::Result<MetricsSnapshot> {
        let timestamp = parse_timestamp(&self.timestamp)
            .with_context(|| format!("invalid timestamp {:?}", self.timestamp))?;
        anyhow::ensure!(!self.repo.trim().is_empty(), "empty repo column");
        Ok(MetricsSnapshot {
            timestamp,
            stars: parse_count(&self.stars)
                .with_context(|| format!("invalid stars for {}", self.repo))?
                .unwrap_or(0),
            latest_release_version: self.latest_release_version,
            published_at: self.published_at,
            daily_downloads: parse_count(&self.daily_downloads)
                .with_context(|| format!("invalid daily_downloads for {}", self.repo))?,
            weekly_downloads: parse_count(&self.weekly_downloads)
                .with_context(|| format!("invalid weekly_downloads for {}", self.repo))?,
            monthly_downloads: parse_count(&self.monthly_downloads)
                .with_context(|| format!("invalid monthly_downloads for {}", self.repo))?,
            total_downloads: parse_count(&self.total_downloads)
                .with_context(|| format!("invalid total_downloads for {}", self.repo))?,
            repo: self.repo,
        })
    }
}

fn count_cell(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Empty cell → `None`; `123` and `123.0` → `Some(123)`. `nan` counts as missing.
pub(super) fn parse_count(raw: &str) -> anyhow::Result<Option<u64>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Ok(Some(n));
    }
    let f: f64 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("not a count: {:?}", raw))?;
    anyhow::ensure!(
        f.is_finite() && f >= 0.0,
        "count must be finite and non-negative, got {}",
        raw
    );
    Ok(Some(f.round() as u64))
}
