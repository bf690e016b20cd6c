//! Read-only clients for the three upstream services.
//!
//! - [`GithubClient`]: stars and latest release per repository.
//! - [`PypiStatsClient`]: last day / week / month download counters per package.
//! - [`PepyClient`]: lifetime download total per package, retried on HTTP 429.
//!
//! Network and decoding failures are returned as [`UpstreamError`] and not handled here;
//! the collection run decides what to do with them.

mod error;
mod github;
mod pepy;
mod pypistats;
pub mod retry;

use std::time::Duration;

pub use error::UpstreamError;
pub use github::GithubClient;
pub use pepy::PepyClient;
pub use pypistats::{PypiStatsClient, RecentDownloads};
pub use retry::RateLimitPolicy;

use crate::config::{CollectionConfig, Credentials, UpstreamConfig};

/// Retry-After fallback when a 429 carries no usable header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// All three clients, built once per process from config.
pub struct Upstreams {
    pub github: GithubClient,
    pub pypistats: PypiStatsClient,
    pub pepy: PepyClient,
}

impl Upstreams {
    pub fn from_config(
        upstream: &UpstreamConfig,
        collection: &CollectionConfig,
        credentials: &Credentials,
    ) -> Result<Self, UpstreamError> {
        let timeout = Duration::from_secs(upstream.request_timeout_secs);
        let policy = RateLimitPolicy::new(
            Duration::from_secs(collection.rate_limit_interval_secs),
            collection.rate_limit_max_attempts,
        );
        Ok(Self {
            github: GithubClient::new(
                build_http_client(&upstream.user_agent, timeout)?,
                &upstream.github_api_url,
                credentials.github_token.clone(),
            ),
            pypistats: PypiStatsClient::new(
                build_http_client(&upstream.user_agent, timeout)?,
                &upstream.pypistats_api_url,
            ),
            pepy: PepyClient::new(
                build_http_client(&upstream.user_agent, timeout)?,
                &upstream.pepy_api_url,
                credentials.pepy_api_key.clone(),
                policy,
            ),
        })
    }
}

pub(crate) fn build_http_client(
    user_agent: &str,
    timeout: Duration,
) -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::Init(format!("HTTP client: {}", e)))
}

/// Pass 2xx responses through; map 429 and every other status to an error.
pub(crate) fn expect_success(
    response: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(UpstreamError::RateLimited { retry_after_secs });
    }
    Err(UpstreamError::Status {
        url: url.to_string(),
        status: status.as_u16(),
    })
}

/// Join a configured base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
