//! Raw feed entries and their conversion into stories

use sha2::{Digest, Sha256};

use recommender_core::{Story, MAX_DESCRIPTION_CHARS};

use crate::html::{strip_html, truncate_chars};
use crate::keywords::extract_keywords;

/// A feed entry as it comes off the wire, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    /// GUID (RSS) or id (Atom)
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    /// Possibly HTML-laden description or summary
    pub description: Option<String>,
}

/// Best-effort article text pulled from a web page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleContent {
    /// Page URL
    pub url: String,
    /// Page title, if present
    pub title: Option<String>,
    /// Extracted plain text
    pub text: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<RawEntry> for Story {
    fn from(entry: RawEntry) -> Self {
        let link = non_empty(entry.link).unwrap_or_default();
        let title = non_empty(entry.title).map(|t| strip_html(&t)).unwrap_or_default();
        let description = strip_html(entry.description.as_deref().unwrap_or_default());

        // GUID, then link, then a short hash of the title
        let id = non_empty(entry.id)
            .or_else(|| (!link.is_empty()).then(|| link.clone()))
            .unwrap_or_else(|| {
                let mut hasher = Sha256::new();
                hasher.update(title.as_bytes());
                hex::encode(&hasher.finalize()[..8])
            });

        let keywords = extract_keywords(&format!("{} {}", title, description));

        Story::new(
            id,
            title,
            link,
            &truncate_chars(&description, MAX_DESCRIPTION_CHARS),
            keywords,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recommender_core::UNTITLED;

    #[test]
    fn test_entry_with_all_fields() {
        let story = Story::from(RawEntry {
            id: Some("guid-1".into()),
            title: Some("Council Approves Budget".into()),
            link: Some("https://example.com/budget".into()),
            description: Some("<p>The council <b>approved</b> the budget.</p>".into()),
        });

        assert_eq!(story.id, "guid-1");
        assert_eq!(story.title, "Council Approves Budget");
        assert_eq!(story.link, "https://example.com/budget");
        assert_eq!(story.description, "The council approved the budget.");
        assert_eq!(story.keywords[0], "council");
        assert!(story.keywords.contains(&"budget".to_string()));
    }

    #[test]
    fn test_id_falls_back_to_link() {
        let story = Story::from(RawEntry {
            id: Some("  ".into()),
            title: Some("Title".into()),
            link: Some("https://example.com/a".into()),
            description: None,
        });
        assert_eq!(story.id, "https://example.com/a");
    }

    #[test]
    fn test_missing_everything() {
        let story = Story::from(RawEntry::default());
        assert_eq!(story.title, UNTITLED);
        assert_eq!(story.link, "");
        assert_eq!(story.description, "");
        assert_eq!(story.id.len(), 16);
        assert!(story.keywords.is_empty());
    }

    #[test]
    fn test_description_truncated_after_stripping() {
        let body = format!("<div>{}</div>", "word ".repeat(100));
        let story = Story::from(RawEntry {
            description: Some(body),
            ..RawEntry::default()
        });
        assert_eq!(story.description.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(!story.description.contains('<'));
    }
}
