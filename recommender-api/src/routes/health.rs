//! Health check endpoint

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    stories_count: usize,
    /// RFC 3339 timestamp of the last successful refresh
    last_updated: Option<String>,
    feed_url: String,
}

/// Report store state without triggering a refresh
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let service = &state.recommendation_service;
    let status = service.status();

    Json(HealthResponse {
        status: "ok",
        stories_count: status.stories_count,
        last_updated: status.last_updated.map(|t| t.to_rfc3339()),
        feed_url: service.cache().default_feed_url().to_string(),
    })
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
