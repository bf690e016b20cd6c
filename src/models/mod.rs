// Domain models

mod dashboard;
mod repository;
mod snapshot;

pub use dashboard::{
    DashboardCharts, DashboardSummary, DualAxisFigure, RepoCard, Series, SeriesPoint,
    TimeSeriesFigure,
};
pub use repository::{PackageSpec, TrackedRepository};
pub use snapshot::{
    DownloadMetrics, MetricsSnapshot, NO_RELEASE, SourceMetrics, format_timestamp, parse_timestamp,
};
