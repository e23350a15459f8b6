//! Story Cache
//!
//! In-memory story store with TTL-based refresh across one or more feeds.
//! Readers always see a complete snapshot; refreshes are serialized so at
//! most one fetch round runs at a time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use recommender_core::{CacheStatus, Story};
use recommender_news::FeedSource;

/// Separator used when joining feed URLs into a source key
const SOURCE_KEY_SEPARATOR: &str = "|";

/// Immutable view of the store, swapped as a unit on refresh
#[derive(Debug, Default)]
struct StoreSnapshot {
    stories: Arc<Vec<Story>>,
    /// Monotonic and wall-clock time of the last successful refresh
    last_refreshed: Option<(Instant, DateTime<Utc>)>,
    source_key: String,
}

impl StoreSnapshot {
    fn is_valid_for(&self, source_key: &str, ttl: Duration) -> bool {
        match self.last_refreshed {
            None => false,
            Some((refreshed_at, _)) => {
                refreshed_at.elapsed() <= ttl
                    && !self.stories.is_empty()
                    && self.source_key == source_key
            }
        }
    }
}

/// Single-slot story cache keyed by the requested feed set
pub struct StoryCache {
    source: Arc<dyn FeedSource>,
    default_feed_url: String,
    ttl: Duration,
    snapshot: RwLock<Arc<StoreSnapshot>>,
    /// Held for the whole check-fetch-publish sequence
    refresh_lock: Mutex<()>,
}

impl StoryCache {
    /// Create an empty cache
    pub fn new(source: Arc<dyn FeedSource>, default_feed_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            source,
            default_feed_url: default_feed_url.into(),
            ttl,
            snapshot: RwLock::new(Arc::new(StoreSnapshot::default())),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Feed used when a request names none
    pub fn default_feed_url(&self) -> &str {
        &self.default_feed_url
    }

    /// Get stories for the requested feeds, refreshing if the store is not valid
    ///
    /// `None` or an empty list means the default feed. On a failed refresh the
    /// previous (possibly stale, possibly empty) stories are returned.
    #[instrument(skip(self))]
    pub async fn get_stories(&self, feed_urls: Option<&[String]>) -> Arc<Vec<Story>> {
        let feeds = self.resolve_feeds(feed_urls);
        let key = source_key(&feeds);

        if let Some(stories) = self.valid_stories(&key) {
            debug!("Using cached stories ({} stories)", stories.len());
            return stories;
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited
        if let Some(stories) = self.valid_stories(&key) {
            debug!("Stories refreshed by a concurrent request");
            return stories;
        }

        let mut fetched = Vec::new();
        for feed_url in &feeds {
            let entries = self.source.fetch_entries(feed_url).await;
            debug!("Feed {} contributed {} entries", feed_url, entries.len());
            fetched.extend(entries.into_iter().map(Story::from));
        }

        if fetched.is_empty() {
            warn!("Failed to fetch stories from {} feed(s), keeping previous cache", feeds.len());
            return self.snapshot.read().stories.clone();
        }

        let now = Utc::now();
        let stories = Arc::new(fetched);
        *self.snapshot.write() = Arc::new(StoreSnapshot {
            stories: Arc::clone(&stories),
            last_refreshed: Some((Instant::now(), now)),
            source_key: key,
        });

        info!(
            "Cache updated at {} with {} stories from {} feed(s)",
            now.to_rfc3339(),
            stories.len(),
            feeds.len()
        );
        stories
    }

    /// Mark the store stale so the next `get_stories` fetches again
    ///
    /// Waits for any in-flight refresh so its result cannot satisfy the next call.
    pub async fn invalidate(&self) {
        let _guard = self.refresh_lock.lock().await;
        let mut snapshot = self.snapshot.write();
        let stale = StoreSnapshot {
            stories: Arc::clone(&snapshot.stories),
            last_refreshed: None,
            source_key: snapshot.source_key.clone(),
        };
        *snapshot = Arc::new(stale);
        info!("Story cache invalidated");
    }

    /// Current story count and last refresh time, without fetching
    pub fn status(&self) -> CacheStatus {
        let snapshot = self.snapshot.read();
        CacheStatus {
            stories_count: snapshot.stories.len(),
            last_updated: snapshot.last_refreshed.map(|(_, at)| at),
        }
    }

    fn valid_stories(&self, key: &str) -> Option<Arc<Vec<Story>>> {
        let snapshot = self.snapshot.read().clone();
        snapshot
            .is_valid_for(key, self.ttl)
            .then(|| Arc::clone(&snapshot.stories))
    }

    /// Requested feeds in request order, blanks and repeats removed
    fn resolve_feeds(&self, feed_urls: Option<&[String]>) -> Vec<String> {
        let mut feeds: Vec<String> = Vec::new();
        for url in feed_urls.unwrap_or_default() {
            let url = url.trim();
            if !url.is_empty() && !feeds.iter().any(|f| f == url) {
                feeds.push(url.to_string());
            }
        }

        if feeds.is_empty() {
            feeds.push(self.default_feed_url.clone());
        }
        feeds
    }
}

/// Order-independent key for a set of feed URLs
pub fn source_key(feeds: &[String]) -> String {
    let mut sorted: Vec<&str> = feeds.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join(SOURCE_KEY_SEPARATOR)
}
