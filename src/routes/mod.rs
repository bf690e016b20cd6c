// HTTP routes: the dashboard page only

mod http;
pub mod page;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::dashboard::Dashboard;
use crate::dataset_repo::DatasetRepo;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dataset: Arc<DatasetRepo>,
    pub(crate) dashboard: Arc<Dashboard>,
}

pub fn app(dataset: Arc<DatasetRepo>, dashboard: Arc<Dashboard>) -> Router {
    let state = AppState { dataset, dashboard };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
