//! Article text extraction endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::warn;

use super::error_response;
use crate::AppState;

/// Request body for extraction
#[derive(Debug, Deserialize)]
pub struct ExtractBody {
    pub url: Option<String>,
}

/// POST /extract - Fetch a page and return its readable text
async fn extract(
    State(state): State<AppState>,
    body: Result<Json<ExtractBody>, JsonRejection>,
) -> impl IntoResponse {
    let url = match body {
        Ok(Json(ExtractBody { url: Some(url) })) if !url.trim().is_empty() => url,
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, "Missing 'url' field"),
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match state.page_extractor.extract(url.trim()).await {
        Ok(article) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "text": article.text
            })),
        )
            .into_response(),
        Err(e) => {
            warn!("Extraction failed for {}: {}", url, e);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

/// Create extraction routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/extract", post(extract))
}
