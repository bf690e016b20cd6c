use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

use crate::models::TrackedRepository;
use crate::registry::{self, Registry};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    pub repositories: Vec<TrackedRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "0.0.0.0".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

fn default_dataset_path() -> String {
    "data/mqt.csv".into()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

/// Base URLs and HTTP settings for the three upstream services.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub github_api_url: String,
    pub pypistats_api_url: String,
    pub pepy_api_url: String,
    /// Per-request timeout; there is no timeout on the run as a whole.
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            github_api_url: "https://api.github.com".into(),
            pypistats_api_url: "https://pypistats.org/api".into(),
            pepy_api_url: "https://api.pepy.tech/api/v2".into(),
            request_timeout_secs: 60,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Cron expression (6 fields, with seconds; local time) for in-process collection
    /// while serving. Unset: collection only runs via `mqt-dashboard collect`.
    pub schedule: Option<String>,
    /// Wait between attempts when the download-count service answers 429.
    pub rate_limit_interval_secs: u64,
    /// Attempts per package before the run gives up on a 429 streak.
    pub rate_limit_max_attempts: u32,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            schedule: None,
            rate_limit_interval_secs: 60,
            rate_limit_max_attempts: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardVariant {
    /// Summary cards sorted by stars and by downloads.
    #[default]
    Cards,
    /// Latest-state table plus time-series charts.
    Charts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub variant: DashboardVariant,
    pub github_url: String,
    pub pypi_url: String,
    /// Organization for rows whose repo is no longer in the registry.
    pub default_organization: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            variant: DashboardVariant::Cards,
            github_url: "https://github.com".into(),
            pypi_url: "https://pypi.org".into(),
            default_organization: "cda-tum".into(),
        }
    }
}

/// Optional API credentials, read from the environment only.
#[derive(Clone, Default)]
pub struct Credentials {
    pub github_token: Option<String>,
    pub pepy_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            github_token: non_empty_env("GITHUB_TOKEN"),
            pepy_api_key: non_empty_env("PEPY_API_KEY"),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("pepy_api_key", &self.pepy_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn registry(&self) -> anyhow::Result<Registry> {
        Registry::new(self.repositories.clone())
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.dataset.path.is_empty(),
            "dataset.path must be non-empty"
        );
        anyhow::ensure!(
            !self.upstream.github_api_url.is_empty(),
            "upstream.github_api_url must be non-empty"
        );
        anyhow::ensure!(
            !self.upstream.pypistats_api_url.is_empty(),
            "upstream.pypistats_api_url must be non-empty"
        );
        anyhow::ensure!(
            !self.upstream.pepy_api_url.is_empty(),
            "upstream.pepy_api_url must be non-empty"
        );
        anyhow::ensure!(
            self.upstream.request_timeout_secs > 0,
            "upstream.request_timeout_secs must be > 0, got {}",
            self.upstream.request_timeout_secs
        );
        anyhow::ensure!(
            self.collection.rate_limit_interval_secs > 0,
            "collection.rate_limit_interval_secs must be > 0, got {}",
            self.collection.rate_limit_interval_secs
        );
        anyhow::ensure!(
            self.collection.rate_limit_max_attempts > 0,
            "collection.rate_limit_max_attempts must be > 0, got {}",
            self.collection.rate_limit_max_attempts
        );
        if let Some(schedule) = &self.collection.schedule {
            cron::Schedule::from_str(schedule)
                .map_err(|e| anyhow::anyhow!("collection.schedule is not a valid cron expression: {}", e))?;
        }
        registry::validate_entries(&self.repositories)?;
        Ok(())
    }
}
