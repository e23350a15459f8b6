//! Story Recommender API Server
//!
//! HTTP API server that recommends related stories from syndication feeds.

mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use recommender_news::{HtmlPageExtractor, PageExtractor, RssClient};
use recommender_services::{RecommendationService, RecommenderConfig, StoryCache};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub recommendation_service: Arc<RecommendationService>,
    pub page_extractor: Arc<dyn PageExtractor>,
}

/// Build the router with CORS, request tracing and panic recovery
fn app(state: AppState) -> Router {
    // Any origin: the consumer is a browser extension running on arbitrary sites
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .merge(routes::api_routes())
        .layer(CatchPanicLayer::custom(routes::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,recommender_api=debug")),
        )
        .init();

    info!("Starting Story Recommender API");

    let config = RecommenderConfig::from_env()?;
    info!(
        "Default feed: {} (cache TTL {}s, feed timeout {}s)",
        config.default_feed_url,
        config.cache_ttl.as_secs(),
        config.feed_timeout.as_secs()
    );

    let feed_source = Arc::new(RssClient::with_timeout(config.feed_timeout));
    let story_cache = Arc::new(StoryCache::new(
        feed_source,
        config.default_feed_url.clone(),
        config.cache_ttl,
    ));

    // Warm the cache so the first request does not pay for the fetch
    let stories = story_cache.get_stories(None).await;
    info!("Loaded {} stories from the default feed", stories.len());
    for story in stories.iter().take(3) {
        info!("  - {}", story.title);
    }

    let page_extractor = Arc::new(HtmlPageExtractor::new(config.feed_timeout)?);
    let recommendation_service = Arc::new(RecommendationService::new(story_cache, config));

    let state = AppState {
        recommendation_service,
        page_extractor,
    };

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
