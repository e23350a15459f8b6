//! API route definitions

mod extract;
mod health;
mod recommend;
mod refresh;

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use recommender_core::RecommenderError;
use tracing::error;

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(recommend::routes())
        .merge(health::routes())
        .merge(refresh::routes())
        .merge(extract::routes())
}

/// JSON `{error}` body with the given status
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": message.into()
        })),
    )
        .into_response()
}

/// Map a service error onto its HTTP status
pub(crate) fn recommender_error_response(err: &RecommenderError) -> Response {
    let status = match err {
        RecommenderError::Validation(_) => StatusCode::BAD_REQUEST,
        RecommenderError::NoStoriesAvailable => StatusCode::SERVICE_UNAVAILABLE,
        RecommenderError::Config(_) | RecommenderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

/// Turn a handler panic into a 500 with a JSON body
pub(crate) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Request handler panicked: {}", detail);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
