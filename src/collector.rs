// Collection run: fetch every tracked repository in registry order, tag all rows with one
// timestamp, append the batch to the dataset.
// Fetches run one after another. Any upstream failure aborts the run before anything is
// written; re-running later is safe.

use anyhow::Context;
use chrono::{DateTime, SubsecRound, Utc};
use tracing::{info, instrument};

use crate::dataset_repo::DatasetRepo;
use crate::models::{DownloadMetrics, MetricsSnapshot, TrackedRepository};
use crate::registry::Registry;
use crate::upstream::Upstreams;

/// Run timestamp, truncated to the precision the dataset stores.
pub fn run_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// One collection run end to end. Returns the rows that were appended.
#[instrument(skip_all, fields(operation = "collect", repositories = registry.len(), dataset = %dataset.path().display()))]
pub async fn run_collection(
    registry: &Registry,
    upstreams: &Upstreams,
    dataset: &DatasetRepo,
) -> anyhow::Result<Vec<MetricsSnapshot>> {
    let timestamp = run_timestamp();
    let snapshots = collect_snapshots(registry, upstreams, timestamp).await?;
    let total_rows = dataset.append_snapshots(&snapshots).await?;
    info!(
        run_timestamp = %timestamp,
        snapshots_count = snapshots.len(),
        total_rows,
        "collection run complete"
    );
    Ok(snapshots)
}

/// Fetch one snapshot per tracked repository, all tagged with `timestamp`.
pub async fn collect_snapshots(
    registry: &Registry,
    upstreams: &Upstreams,
    timestamp: DateTime<Utc>,
) -> anyhow::Result<Vec<MetricsSnapshot>> {
    let mut snapshots = Vec::with_capacity(registry.len());
    for repo in registry {
        let snapshot = collect_one(repo, upstreams, timestamp)
            .await
            .with_context(|| format!("collecting {}/{}", repo.organization, repo.source_path()))?;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

async fn collect_one(
    repo: &TrackedRepository,
    upstreams: &Upstreams,
    timestamp: DateTime<Utc>,
) -> anyhow::Result<MetricsSnapshot> {
    info!(
        org = %repo.organization,
        repo = %repo.source_path(),
        "Collecting data"
    );
    let source = upstreams
        .github
        .fetch(&repo.organization, repo.source_path())
        .await?;

    let downloads = match repo.package_identifier() {
        Some(package) => Some(fetch_downloads(upstreams, package).await?),
        None => None,
    };

    Ok(MetricsSnapshot::new(timestamp, &repo.name, source, downloads))
}

async fn fetch_downloads(upstreams: &Upstreams, package: &str) -> anyhow::Result<DownloadMetrics> {
    let recent = upstreams.pypistats.recent_downloads(package).await?;
    let total = upstreams.pepy.total_downloads(package).await?;
    Ok(DownloadMetrics {
        daily: recent.last_day,
        weekly: recent.last_week,
        monthly: recent.last_month,
        total,
    })
}
