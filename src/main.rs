use anyhow::Result;
use clap::{Parser, Subcommand};
use mqt_dashboard::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Collect GitHub and PyPI statistics for MQT repositories and serve a dashboard"
)]
struct Cli {
    /// Path to config.toml (defaults to CONFIG_FILE, then ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch metrics for every tracked repository once and append them to the dataset
    Collect,
    /// Serve the dashboard; also collects on `collection.schedule` when it is set
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let app_config = match &cli.config {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    let registry = app_config.registry()?;
    let dataset = Arc::new(dataset_repo::DatasetRepo::new(&app_config.dataset.path));

    match cli.command {
        Command::Collect => collect(&app_config, &registry, &dataset).await,
        Command::Serve => serve(app_config, registry, dataset).await,
    }
}

async fn collect(
    app_config: &config::AppConfig,
    registry: &registry::Registry,
    dataset: &dataset_repo::DatasetRepo,
) -> Result<()> {
    let upstreams = upstream::Upstreams::from_config(
        &app_config.upstream,
        &app_config.collection,
        &config::Credentials::from_env(),
    )?;
    let rows = collector::run_collection(registry, &upstreams, dataset).await?;
    tracing::info!("Data collection complete. Latest data:");
    for row in &rows {
        tracing::info!(
            repo = %row.repo,
            stars = row.stars,
            latest_release_version = %row.latest_release_version,
            published_at = %row.published_at,
            daily_downloads = ?row.daily_downloads,
            weekly_downloads = ?row.weekly_downloads,
            monthly_downloads = ?row.monthly_downloads,
            total_downloads = ?row.total_downloads,
            "snapshot"
        );
    }
    Ok(())
}

async fn serve(
    app_config: config::AppConfig,
    registry: registry::Registry,
    dataset: Arc<dataset_repo::DatasetRepo>,
) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let scheduler_handle = match &app_config.collection.schedule {
        Some(expr) => {
            let schedule = scheduler::parse_schedule(expr)?;
            let upstreams = upstream::Upstreams::from_config(
                &app_config.upstream,
                &app_config.collection,
                &config::Credentials::from_env(),
            )?;
            tracing::info!(schedule = %expr, "scheduled collection enabled");
            Some(scheduler::spawn(
                scheduler::CollectionJob {
                    registry: registry.clone(),
                    upstreams,
                    dataset: dataset.clone(),
                },
                schedule,
                shutdown_rx,
            ))
        }
        None => None,
    };

    let dashboard = Arc::new(dashboard::Dashboard::new(
        registry,
        app_config.dashboard.clone(),
    ));
    let app = routes::app(dataset, dashboard);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    if let Some(handle) = scheduler_handle {
        let _ = handle.await;
    }
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
