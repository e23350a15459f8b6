//! RSS Feed Client for story ingestion
//!
//! Fetches and parses RSS/Atom feeds into raw entries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::NewsError;
use crate::types::RawEntry;

/// Default per-request timeout for feed fetches
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// A syndication endpoint that yields story entries
///
/// Implementations never fail: any fetch or parse problem yields an empty
/// sequence so one broken feed cannot abort a multi-feed refresh.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch all entries currently published at `feed_url`
    async fn fetch_entries(&self, feed_url: &str) -> Vec<RawEntry>;
}

/// RSS/Atom feed client
pub struct RssClient {
    client: Client,
}

impl RssClient {
    /// Create a new RSS client with the default timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_FEED_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Fetch and parse a single feed
    pub async fn fetch_feed(&self, feed_url: &str) -> Result<Vec<RawEntry>, NewsError> {
        let response = self
            .client
            .get(feed_url)
            .header("User-Agent", "StoryRecommender/1.0")
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NewsError::ApiError {
                status: response.status().as_u16(),
                message: format!("Failed to fetch {}", feed_url),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        parse_feed(&content).ok_or_else(|| {
            NewsError::ParseError(format!("Failed to parse feed: {}", feed_url))
        })
    }
}

impl Default for RssClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedSource for RssClient {
    async fn fetch_entries(&self, feed_url: &str) -> Vec<RawEntry> {
        match self.fetch_feed(feed_url).await {
            Ok(entries) => {
                info!("Fetched {} entries from feed: {}", entries.len(), feed_url);
                entries
            }
            Err(e) => {
                warn!("Failed to fetch feed {}: {}", feed_url, e);
                Vec::new()
            }
        }
    }
}

/// Parse a feed body, trying RSS first and then Atom
pub fn parse_feed(content: &[u8]) -> Option<Vec<RawEntry>> {
    if let Ok(channel) = rss::Channel::read_from(content) {
        return Some(parse_rss_channel(&channel));
    }

    if let Ok(atom_feed) = atom_syndication::Feed::read_from(content) {
        return Some(parse_atom_feed(&atom_feed));
    }

    debug!("Body is neither RSS nor Atom ({} bytes)", content.len());
    None
}

/// Parse RSS channel into raw entries
fn parse_rss_channel(channel: &rss::Channel) -> Vec<RawEntry> {
    channel
        .items()
        .iter()
        .map(|item| RawEntry {
            id: item.guid().map(|g| g.value().to_string()),
            title: item.title().map(str::to_string),
            link: item.link().map(str::to_string),
            description: item
                .description()
                .filter(|d| !d.trim().is_empty())
                .or_else(|| item.content())
                .map(str::to_string),
        })
        .collect()
}

/// Parse Atom feed into raw entries
fn parse_atom_feed(atom_feed: &atom_syndication::Feed) -> Vec<RawEntry> {
    atom_feed
        .entries()
        .iter()
        .map(|entry| {
            let summary = entry.summary().map(|s| s.value.as_str()).unwrap_or_default();
            let content = entry.content().and_then(|c| c.value()).unwrap_or_default();
            let description = if !summary.trim().is_empty() {
                summary
            } else {
                content
            };

            RawEntry {
                id: Some(entry.id().to_string()),
                title: Some(entry.title().to_string()),
                link: entry
                    .links()
                    .iter()
                    .find(|l| l.rel() == "alternate")
                    .or_else(|| entry.links().first())
                    .map(|l| l.href().to_string()),
                description: Some(description.to_string()),
            }
        })
        .collect()
}
