// GET / handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::{AppState, page};
use crate::config::DashboardVariant;

/// GET /: reloads and aggregates the whole dataset on every request (no caching).
pub(super) async fn index_handler(State(state): State<AppState>) -> Response {
    match render_index(&state).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(
                error = %format!("{:#}", e),
                operation = "render_index",
                "failed to render dashboard"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

async fn render_index(state: &AppState) -> anyhow::Result<String> {
    let rows = state.dataset.load_all().await?;
    match state.dashboard.variant() {
        DashboardVariant::Cards => Ok(page::render_cards(&state.dashboard.summary(&rows))),
        DashboardVariant::Charts => page::render_charts(&state.dashboard.charts(&rows)),
    }
}
