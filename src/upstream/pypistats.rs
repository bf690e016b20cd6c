// Package-index client: recent download counters

use serde::Deserialize;
use tracing::instrument;

use super::{UpstreamError, expect_success, join_url};

/// Counters from the `recent` endpoint; each defaults to 0 when missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecentDownloads {
    pub last_day: u64,
    pub last_week: u64,
    pub last_month: u64,
}

pub struct PypiStatsClient {
    client: reqwest::Client,
    api_url: String,
}

impl PypiStatsClient {
    pub fn new(client: reqwest::Client, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self), fields(upstream = "pypistats"))]
    pub async fn recent_downloads(&self, package: &str) -> Result<RecentDownloads, UpstreamError> {
        let url = join_url(&self.api_url, &format!("packages/{}/recent", package));
        let response = self.client.get(&url).send().await?;
        let body: RecentResponse = expect_success(response, &url)?.json().await?;
        let data = body.data.unwrap_or_default();
        Ok(RecentDownloads {
            last_day: data.last_day.unwrap_or(0),
            last_week: data.last_week.unwrap_or(0),
            last_month: data.last_month.unwrap_or(0),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RecentResponse {
    #[serde(default)]
    data: Option<RecentData>,
}

#[derive(Debug, Default, Deserialize)]
struct RecentData {
    #[serde(default)]
    last_day: Option<u64>,
    #[serde(default)]
    last_week: Option<u64>,
    #[serde(default)]
    last_month: Option<u64>,
}
