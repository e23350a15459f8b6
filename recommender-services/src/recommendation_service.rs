//! Recommendation Service
//!
//! Orchestrates the story cache and the similarity ranker into the
//! externally visible `recommend` operation.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use recommender_core::{CacheStatus, Recommendation, RecommenderError, RecommenderResult};

use crate::config::RecommenderConfig;
use crate::similarity::SimilarityRanker;
use crate::story_cache::StoryCache;

/// Parameters of a single recommendation request
#[derive(Debug, Clone, Default)]
pub struct RecommendRequest {
    /// Article text to find related stories for
    pub text: String,
    /// Story id to leave out (the article being read)
    pub exclude_id: Option<String>,
    /// Feeds to draw candidates from; `None` means the default feed
    pub feed_urls: Option<Vec<String>>,
    /// Minimum similarity; `None` means the configured default
    pub min_similarity: Option<f64>,
}

/// Recommends related stories for a piece of text
pub struct RecommendationService {
    cache: Arc<StoryCache>,
    ranker: SimilarityRanker,
    config: RecommenderConfig,
}

impl RecommendationService {
    pub fn new(cache: Arc<StoryCache>, config: RecommenderConfig) -> Self {
        Self {
            cache,
            ranker: SimilarityRanker::new(),
            config,
        }
    }

    /// The underlying story cache
    pub fn cache(&self) -> &Arc<StoryCache> {
        &self.cache
    }

    /// Recommend up to `max_results` stories similar to the request text
    #[instrument(skip(self, request), fields(text_len = request.text.len()))]
    pub async fn recommend(&self, request: &RecommendRequest) -> RecommenderResult<Vec<Recommendation>> {
        let min_similarity = request
            .min_similarity
            .unwrap_or(self.config.default_min_similarity);
        if !min_similarity.is_finite() {
            return Err(RecommenderError::validation("'min_similarity' must be a finite number"));
        }

        let stories = self.cache.get_stories(request.feed_urls.as_deref()).await;
        if stories.is_empty() {
            return Err(RecommenderError::NoStoriesAvailable);
        }

        let exclude_id = request.exclude_id.as_deref().filter(|id| !id.is_empty());
        let candidates: Vec<_> = stories
            .iter()
            .filter(|story| Some(story.id.as_str()) != exclude_id)
            .cloned()
            .collect();

        if candidates.is_empty() {
            debug!("Every candidate was excluded");
            return Ok(Vec::new());
        }

        let outcome = self.ranker.rank(&request.text, &candidates);
        let degraded = outcome.is_degraded();
        let scored = outcome.into_scored();

        let recommendations: Vec<Recommendation> = scored
            .iter()
            .take(self.config.candidate_pool)
            .filter(|s| s.score >= min_similarity)
            .take(self.config.max_results)
            .map(|s| Recommendation::from(s.story))
            .collect();

        let top_scores: Vec<String> = scored
            .iter()
            .take(self.config.max_results)
            .map(|s| format!("{:.3}", s.score))
            .collect();
        info!(
            "Top recommendation scores: [{}] (degraded: {}), threshold {}, {} recommendation(s) after filtering",
            top_scores.join(", "),
            degraded,
            min_similarity,
            recommendations.len()
        );

        Ok(recommendations)
    }

    /// Invalidate the cache and re-fetch the default feed
    pub async fn force_refresh(&self) -> usize {
        self.cache.invalidate().await;
        self.cache.get_stories(None).await.len()
    }

    /// Story count and last refresh time, without fetching
    pub fn status(&self) -> CacheStatus {
        self.cache.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use recommender_news::{FeedSource, RawEntry};
    use tokio_test::{assert_err, assert_ok};

    const FEED: &str = "https://example.com/feed";

    /// Serves fixed entries per feed URL and counts fetches
    #[derive(Default)]
    struct StaticFeedSource {
        feeds: HashMap<String, Vec<RawEntry>>,
        fetches: parking_lot::Mutex<usize>,
    }

    #[async_trait]
    impl FeedSource for StaticFeedSource {
        async fn fetch_entries(&self, feed_url: &str) -> Vec<RawEntry> {
            *self.fetches.lock() += 1;
            self.feeds.get(feed_url).cloned().unwrap_or_default()
        }
    }

    fn entry(id: &str, title: &str, description: &str) -> RawEntry {
        RawEntry {
            id: Some(id.to_string()),
            title: Some(title.to_string()),
            link: Some(format!("https://example.com/{id}")),
            description: Some(description.to_string()),
        }
    }

    fn local_news() -> Vec<RawEntry> {
        vec![
            entry("1", "City Council Approves Budget", "The council voted 5-2 on the city budget."),
            entry("2", "Local Bakery Wins Award", "A downtown bakery took home a state award."),
            entry("3", "Parks Department Plants Trees", "Volunteers planted oaks along the river trail."),
        ]
    }

    fn service_with(entries: Vec<RawEntry>) -> (RecommendationService, Arc<StaticFeedSource>) {
        let source = Arc::new(StaticFeedSource {
            feeds: HashMap::from([(FEED.to_string(), entries)]),
            ..StaticFeedSource::default()
        });
        let config = RecommenderConfig {
            default_feed_url: FEED.to_string(),
            ..RecommenderConfig::default()
        };
        let cache = Arc::new(StoryCache::new(source.clone(), FEED, config.cache_ttl));
        (RecommendationService::new(cache, config), source)
    }

    fn request(text: &str) -> RecommendRequest {
        RecommendRequest {
            text: text.to_string(),
            exclude_id: Some(String::new()),
            min_similarity: Some(0.01),
            ..RecommendRequest::default()
        }
    }

    fn position(recs: &[Recommendation], id: &str) -> Option<usize> {
        let link = format!("https://example.com/{id}");
        recs.iter().position(|r| r.link == link)
    }

    #[tokio::test]
    async fn test_best_match_ranked_first() {
        let (service, _) = service_with(local_news());
        let recs = assert_ok!(service.recommend(&request("City council budget vote")).await);

        let budget = position(&recs, "1").expect("budget story recommended");
        assert_eq!(budget, 0);
        if let Some(bakery) = position(&recs, "2") {
            assert!(budget < bakery);
        }
        assert_eq!(recs[0].title, "City Council Approves Budget");
    }

    #[tokio::test]
    async fn test_excluded_story_never_returned() {
        let (service, _) = service_with(local_news());
        let req = RecommendRequest {
            exclude_id: Some("1".to_string()),
            ..request("City council budget vote")
        };
        let recs = service.recommend(&req).await.unwrap();
        assert_eq!(position(&recs, "1"), None);
    }

    #[tokio::test]
    async fn test_high_threshold_filters_everything() {
        let (service, _) = service_with(local_news());
        let req = RecommendRequest {
            min_similarity: Some(0.99),
            ..request("City council budget vote")
        };
        assert!(service.recommend(&req).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_stories_available() {
        let (service, _) = service_with(Vec::new());
        let err = assert_err!(service.recommend(&request("anything")).await);
        assert!(matches!(err, RecommenderError::NoStoriesAvailable));
    }

    #[tokio::test]
    async fn test_only_story_excluded_yields_empty_list() {
        let (service, _) = service_with(vec![entry("only", "Only Story", "Nothing else.")]);
        let req = RecommendRequest {
            exclude_id: Some("only".to_string()),
            ..request("only story")
        };
        assert!(service.recommend(&req).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_text_is_still_ranked() {
        let (service, source) = service_with(local_news());

        let recs = assert_ok!(service.recommend(&request("")).await);
        assert!(recs.is_empty());
        assert_eq!(*source.fetches.lock(), 1);

        let req = RecommendRequest {
            min_similarity: Some(0.0),
            ..request("   ")
        };
        let recs = assert_ok!(service.recommend(&req).await);
        assert_eq!(recs.len(), 3);
    }

    #[tokio::test]
    async fn test_caps_results_at_five() {
        let entries = (0..8)
            .map(|i| entry(&format!("s{i}"), &format!("Story {i}"), "Unrelated copy."))
            .collect();
        let (service, _) = service_with(entries);

        // A zero threshold keeps every ranked candidate
        let req = RecommendRequest {
            min_similarity: Some(0.0),
            ..request("transit plan")
        };
        let recs = service.recommend(&req).await.unwrap();
        assert_eq!(recs.len(), 5);
    }

    #[tokio::test]
    async fn test_threshold_applies_within_candidate_pool() {
        let (mut service, _) = service_with(local_news());
        service.config.candidate_pool = 2;

        let req = RecommendRequest {
            min_similarity: Some(0.0),
            ..request("City council budget vote")
        };
        let recs = service.recommend(&req).await.unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(position(&recs, "1"), Some(0));
    }

    #[tokio::test]
    async fn test_degraded_ranking_still_answers() {
        let (service, _) = service_with(vec![entry("1", "The", "of the and")]);
        let req = RecommendRequest {
            min_similarity: Some(0.0),
            ..request("the and of")
        };
        let recs = service.recommend(&req).await.unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_refetches() {
        let (service, source) = service_with(local_news());
        assert_eq!(service.status().stories_count, 0);
        assert!(service.status().last_updated.is_none());

        service.recommend(&request("bakery")).await.unwrap();
        assert_eq!(*source.fetches.lock(), 1);

        let count = service.force_refresh().await;
        assert_eq!(count, 3);
        assert_eq!(*source.fetches.lock(), 2);
        assert!(service.status().last_updated.is_some());
    }

    #[tokio::test]
    async fn test_stories_cached_between_requests() {
        let (service, source) = service_with(local_news());
        service.recommend(&request("bakery award")).await.unwrap();
        service.recommend(&request("parks trees")).await.unwrap();
        assert_eq!(*source.fetches.lock(), 1);
        assert_eq!(service.cache().default_feed_url(), FEED);
    }
}
