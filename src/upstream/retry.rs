//! Fixed-interval retry for rate-limited requests.
//!
//! The download-count service answers 429 when the quota is used up. The collection run
//! is a low-frequency batch job, so it waits a fixed interval and asks again instead of
//! failing. The number of attempts is capped, and the wait is a plain `tokio::time::sleep`,
//! so dropping the future (e.g. on shutdown) cancels it.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::UpstreamError;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Wait between attempts. Fixed; a Retry-After header does not change it.
    pub interval: Duration,
    /// Total attempts including the first one.
    pub max_attempts: u32,
}

impl RateLimitPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Run `operation` until it returns something other than [`UpstreamError::RateLimited`],
/// sleeping `policy.interval` between attempts.
pub async fn retry_rate_limited<F, Fut, T>(
    policy: &RateLimitPolicy,
    entity: &str,
    mut operation: F,
) -> Result<T, UpstreamError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match operation().await {
            Err(UpstreamError::RateLimited { retry_after_secs }) => {
                if attempt >= policy.max_attempts {
                    return Err(UpstreamError::RateLimitExhausted {
                        entity: entity.to_string(),
                        attempts: attempt,
                    });
                }
                warn!(
                    entity,
                    attempt,
                    retry_after_secs,
                    wait_secs = policy.interval.as_secs(),
                    "Rate limit exceeded; waiting before retrying"
                );
                tokio::time::sleep(policy.interval).await;
            }
            other => {
                if attempt > 1 {
                    debug!(entity, attempts = attempt, "rate-limited request completed");
                }
                return other;
            }
        }
    }
}
