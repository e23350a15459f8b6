//! Forced cache refresh

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Serialize;
use tracing::info;

use crate::AppState;

#[derive(Debug, Serialize)]
struct RefreshResponse {
    status: &'static str,
    stories_count: usize,
}

/// POST /refresh - Drop cached stories and re-fetch the default feed
async fn refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let stories_count = state.recommendation_service.force_refresh().await;
    info!("Forced refresh loaded {} stories", stories_count);

    Json(RefreshResponse {
        status: "refreshed",
        stories_count,
    })
}

/// Create refresh routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/refresh", post(refresh))
}
