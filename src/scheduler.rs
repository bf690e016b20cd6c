// In-process collection schedule for the `serve` command.
// Fires on a cron expression (local time). Runs never overlap: the next fire time is
// computed only after the previous run has finished. Shutdown cancels a pending wait
// or an in-flight run; a cancelled run writes nothing.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::collector::run_collection;
use crate::dataset_repo::DatasetRepo;
use crate::registry::Registry;
use crate::upstream::Upstreams;

/// Everything one collection run needs.
pub struct CollectionJob {
    pub registry: Registry,
    pub upstreams: Upstreams,
    pub dataset: Arc<DatasetRepo>,
}

pub fn parse_schedule(expr: &str) -> anyhow::Result<cron::Schedule> {
    cron::Schedule::from_str(expr)
        .map_err(|e| anyhow::anyhow!("invalid collection schedule {:?}: {}", expr, e))
}

/// Next fire time strictly after `now`, if the schedule has one.
pub fn next_fire_time(schedule: &cron::Schedule, now: &DateTime<Local>) -> Option<DateTime<Local>> {
    schedule.after(now).next()
}

pub fn spawn(
    job: CollectionJob,
    schedule: cron::Schedule,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(job, schedule, shutdown_rx))
}

async fn run(
    job: CollectionJob,
    schedule: cron::Schedule,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    let mut runs_completed: u64 = 0;
    let mut runs_failed: u64 = 0;
    loop {
        let now = Local::now();
        let Some(next) = next_fire_time(&schedule, &now) else {
            warn!("collection schedule has no upcoming fire times; scheduler stopping");
            break;
        };
        let delay = (next - now).to_std().unwrap_or(Duration::from_secs(1));
        info!(next_run = %next, "next collection run scheduled");

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = &mut shutdown_rx => {
                debug!("Scheduler shutting down");
                break;
            }
        }

        tokio::select! {
            result = run_collection(&job.registry, &job.upstreams, &job.dataset) => {
                match result {
                    Ok(rows) => {
                        runs_completed += 1;
                        info!(
                            snapshots_count = rows.len(),
                            runs_completed,
                            runs_failed,
                            "scheduled collection finished"
                        );
                    }
                    Err(e) => {
                        runs_failed += 1;
                        warn!(
                            error = %format!("{:#}", e),
                            operation = "run_collection",
                            runs_failed,
                            "scheduled collection failed; dashboard keeps the previous data"
                        );
                    }
                }
            }
            _ = &mut shutdown_rx => {
                info!("Shutdown during collection run; run discarded");
                break;
            }
        }
    }
}
