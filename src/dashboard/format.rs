// Display formatting for counts and release dates

use crate::models::{NO_RELEASE, parse_timestamp};

/// Shown for download columns of repositories without a package.
pub const NOT_AVAILABLE: &str = "N/A";

/// `999` → `"999"`, `1500` → `"1.5k"`, `2_300_000` → `"2.3m"`.
pub fn format_count(count: f64) -> String {
    if count >= 1e6 {
        format!("{:.1}m", count / 1e6)
    } else if count >= 1e3 {
        format!("{:.1}k", count / 1e3)
    } else {
        format!("{:.0}", count)
    }
}

pub fn format_optional_count(count: Option<u64>) -> String {
    match count {
        Some(n) => format_count(n as f64),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Release tag as stored; an empty cell means no release.
pub fn format_release_version(raw: &str) -> String {
    if raw.trim().is_empty() {
        NO_RELEASE.to_string()
    } else {
        raw.to_string()
    }
}

/// `2024-03-05T10:00:00Z` → `"05 March 2024"`; anything unparsable → `"No release"`.
pub fn format_published_at(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%d %B %Y").to_string(),
        None => NO_RELEASE.to_string(),
    }
}
