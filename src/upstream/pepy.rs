// Aggregate download-count client (lifetime totals), retried while rate limited

use serde::Deserialize;
use tracing::instrument;

use super::retry::{RateLimitPolicy, retry_rate_limited};
use super::{UpstreamError, expect_success, join_url};

pub struct PepyClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    policy: RateLimitPolicy,
}

impl PepyClient {
    pub fn new(
        client: reqwest::Client,
        api_url: &str,
        api_key: Option<String>,
        policy: RateLimitPolicy,
    ) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            policy,
        }
    }

    /// Lifetime downloads; 0 when the service omits the field.
    #[instrument(skip(self), fields(upstream = "pepy"))]
    pub async fn total_downloads(&self, package: &str) -> Result<u64, UpstreamError> {
        retry_rate_limited(&self.policy, package, || self.total_downloads_once(package)).await
    }

    async fn total_downloads_once(&self, package: &str) -> Result<u64, UpstreamError> {
        let url = join_url(&self.api_url, &format!("projects/{}", package));
        let mut request = self.client.get(&url);
        if let Some(ref key) = self.api_key {
            request = request.header("X-Api-Key", key);
        }
        let response = request.send().await?;
        let body: ProjectResponse = expect_success(response, &url)?.json().await?;
        Ok(body.total_downloads.unwrap_or(0))
    }
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    #[serde(default)]
    total_downloads: Option<u64>,
}
