//! Story data structures shared by the feed cache, the ranker and the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum stored description length, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Maximum number of keywords kept per story
pub const MAX_KEYWORDS: usize = 10;

/// Title used when a feed entry has none
pub const UNTITLED: &str = "Untitled";

/// A story known to the recommender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Feed-provided GUID, falling back to the link
    pub id: String,
    /// Story title (never empty)
    pub title: String,
    /// Link to the original article (may be empty)
    pub link: String,
    /// HTML-stripped, truncated summary
    pub description: String,
    /// Most frequent terms, most frequent first
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Story {
    /// Build a story, enforcing the title, description and keyword bounds.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
        description: &str,
        mut keywords: Vec<String>,
    ) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            title
        };
        keywords.truncate(MAX_KEYWORDS);

        Self {
            id: id.into(),
            title,
            link: link.into(),
            description: description.chars().take(MAX_DESCRIPTION_CHARS).collect(),
            keywords,
        }
    }

    /// Text used for similarity ranking: the title twice, then the description.
    pub fn ranking_text(&self) -> String {
        format!("{} {} {}", self.title, self.title, self.description)
    }
}

/// The only part of a story exposed to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub link: String,
}

impl From<&Story> for Recommendation {
    fn from(story: &Story) -> Self {
        Self {
            title: story.title.clone(),
            link: story.link.clone(),
        }
    }
}

/// Point-in-time view of the story store, used for health reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    /// Number of stories currently held
    pub stories_count: usize,
    /// When the store was last refreshed successfully
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_truncates_description_by_chars() {
        let long = "é".repeat(MAX_DESCRIPTION_CHARS + 50);
        let story = Story::new("1", "Title", "https://example.com", &long, vec![]);
        assert_eq!(story.description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_story_defaults_empty_title() {
        let story = Story::new("1", "   ", "", "body", vec![]);
        assert_eq!(story.title, UNTITLED);
    }

    #[test]
    fn test_story_caps_keywords() {
        let keywords = (0..15).map(|i| format!("word{i}")).collect();
        let story = Story::new("1", "Title", "", "", keywords);
        assert_eq!(story.keywords.len(), MAX_KEYWORDS);
        assert_eq!(story.keywords[0], "word0");
    }

    #[test]
    fn test_ranking_text_doubles_title() {
        let story = Story::new("1", "Budget Vote", "", "Council met.", vec![]);
        assert_eq!(story.ranking_text(), "Budget Vote Budget Vote Council met.");
    }

    #[test]
    fn test_recommendation_projection() {
        let story = Story::new("id-1", "Title", "https://example.com/a", "desc", vec!["desc".into()]);
        let json = serde_json::to_value(Recommendation::from(&story)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": "Title", "link": "https://example.com/a" })
        );
    }
}
