//! Service configuration

use std::time::Duration;

use recommender_core::RecommenderError;

/// Feed used when a request names none
pub const DEFAULT_FEED_URL: &str = "https://www.mirrorindy.org/feed";

/// Configuration for the feed cache and recommendation service
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    /// Feed used when a request names none
    pub default_feed_url: String,
    /// Maximum age of cached stories before a refresh
    pub cache_ttl: Duration,
    /// Per-request timeout for feed fetches
    pub feed_timeout: Duration,
    /// Ranked candidates eligible for recommendation
    pub candidate_pool: usize,
    /// Maximum recommendations returned
    pub max_results: usize,
    /// Threshold applied when a request does not set one
    pub default_min_similarity: f64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_feed_url: DEFAULT_FEED_URL.to_string(),
            cache_ttl: Duration::from_secs(15 * 60),
            feed_timeout: Duration::from_secs(10),
            candidate_pool: 10,
            max_results: 5,
            default_min_similarity: 0.01,
        }
    }
}

impl RecommenderConfig {
    /// Build from environment variables, falling back to defaults
    ///
    /// Reads `DEFAULT_FEED_URL`, `CACHE_TTL_SECS` and `FEED_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, RecommenderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RecommenderError> {
        let mut config = Self::default();

        if let Some(url) = lookup("DEFAULT_FEED_URL").filter(|u| !u.trim().is_empty()) {
            config.default_feed_url = url.trim().to_string();
        }
        if let Some(secs) = lookup("CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(parse_secs("CACHE_TTL_SECS", &secs)?);
        }
        if let Some(secs) = lookup("FEED_TIMEOUT_SECS") {
            let secs = parse_secs("FEED_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(RecommenderError::config("FEED_TIMEOUT_SECS must be positive"));
            }
            config.feed_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, RecommenderError> {
    value
        .trim()
        .parse()
        .map_err(|_| RecommenderError::config(format!("{} must be a whole number of seconds, got {:?}", key, value)))
}
