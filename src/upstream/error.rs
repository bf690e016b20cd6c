use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Failed to build the HTTP client (TLS or proxy misconfiguration)
    #[error("failed to initialize upstream client: {0}")]
    Init(String),

    /// Transport failure, timeout, or undecodable body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status other than 429
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("still rate limited for {entity} after {attempts} attempts")]
    RateLimitExhausted { entity: String, attempts: u32 },
}
