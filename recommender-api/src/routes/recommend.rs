//! Recommendation endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use recommender_core::{Recommendation, RecommenderError};
use recommender_services::RecommendRequest;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{error_response, recommender_error_response};
use crate::AppState;

/// `feed_urls` may be sent as a list or as a single string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FeedUrls {
    Many(Vec<String>),
    One(String),
}

impl From<FeedUrls> for Vec<String> {
    fn from(urls: FeedUrls) -> Self {
        match urls {
            FeedUrls::Many(urls) => urls,
            FeedUrls::One(url) => vec![url],
        }
    }
}

/// Request body for recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendBody {
    pub text: Option<String>,
    pub exclude_id: Option<String>,
    pub feed_urls: Option<FeedUrls>,
    /// Single-feed alias used when `feed_urls` is absent or names no feed
    pub feed_url: Option<String>,
    pub min_similarity: Option<f64>,
}

impl TryFrom<RecommendBody> for RecommendRequest {
    type Error = RecommenderError;

    fn try_from(body: RecommendBody) -> Result<Self, Self::Error> {
        // Only an absent key is missing; empty text is still ranked
        let text = body
            .text
            .ok_or_else(|| RecommenderError::validation("Missing 'text' field"))?;

        let feed_urls = body
            .feed_urls
            .map(Vec::from)
            .filter(|urls| urls.iter().any(|url| !url.trim().is_empty()))
            .or_else(|| body.feed_url.map(|url| vec![url]));

        Ok(RecommendRequest {
            text,
            exclude_id: body.exclude_id,
            feed_urls,
            min_similarity: body.min_similarity,
        })
    }
}

#[derive(Debug, Serialize)]
struct RecommendResponse {
    recommendations: Vec<Recommendation>,
}

/// POST /recommend - Stories related to the posted article text
async fn recommend(
    State(state): State<AppState>,
    body: Result<Json<RecommendBody>, JsonRejection>,
) -> impl IntoResponse {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Rejected recommend body: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let request = match RecommendRequest::try_from(body) {
        Ok(request) => request,
        Err(e) => return recommender_error_response(&e),
    };
    match state.recommendation_service.recommend(&request).await {
        Ok(recommendations) => (StatusCode::OK, Json(RecommendResponse { recommendations })).into_response(),
        Err(e) => {
            if !e.is_client_error() {
                error!("Recommendation failed: {}", e);
            }
            recommender_error_response(&e)
        }
    }
}

/// Create recommendation routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/recommend", post(recommend))
}
