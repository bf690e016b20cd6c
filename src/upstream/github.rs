// Source-host client: repository metadata and latest release

use serde::Deserialize;
use tracing::{debug, instrument};

use super::{UpstreamError, expect_success, join_url};
use crate::models::{NO_RELEASE, SourceMetrics};

pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// `token` is optional; without it requests go out unauthenticated (lower rate limit).
    pub fn new(client: reqwest::Client, api_url: &str, token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Stars plus latest release tag and publish date. A repository without releases
    /// gets "No release" for both.
    #[instrument(skip(self), fields(upstream = "github"))]
    pub async fn fetch(&self, org: &str, repo: &str) -> Result<SourceMetrics, UpstreamError> {
        let url = join_url(&self.api_url, &format!("repos/{}/{}", org, repo));
        let response = self.build_request(&url).send().await?;
        let repo_data: RepoResponse = expect_success(response, &url)?.json().await?;

        let release = self.fetch_latest_release(org, repo).await?;
        let (latest_release_version, published_at) = match release {
            Some(r) => (
                r.tag_name.unwrap_or_else(|| NO_RELEASE.to_string()),
                r.published_at.unwrap_or_else(|| NO_RELEASE.to_string()),
            ),
            None => (NO_RELEASE.to_string(), NO_RELEASE.to_string()),
        };

        Ok(SourceMetrics {
            stars: repo_data.stargazers_count.unwrap_or(0),
            latest_release_version,
            published_at,
        })
    }

    async fn fetch_latest_release(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Option<ReleaseResponse>, UpstreamError> {
        let url = join_url(&self.api_url, &format!("repos/{}/{}/releases/latest", org, repo));
        let response = self.build_request(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(org, repo, "no published release");
            return Ok(None);
        }
        let release = expect_success(response, &url)?.json().await?;
        Ok(Some(release))
    }
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    #[serde(default)]
    stargazers_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}
