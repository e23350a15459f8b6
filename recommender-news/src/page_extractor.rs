//! Article text extraction from arbitrary web pages

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::error::NewsError;
use crate::types::ArticleContent;

/// Containers that usually hold the article body, most specific first
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=main]",
    ".entry-content",
    ".post-content",
    ".article-body",
    "#content",
];

/// Shortest extraction accepted from a single strategy
const MIN_TEXT_CHARS: usize = 100;

/// Pulls best-effort plain text out of a page
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ArticleContent, NewsError>;
}

/// Fetches a page over HTTP and extracts its text with CSS selectors
#[derive(Debug, Clone)]
pub struct HtmlPageExtractor {
    client: Client,
}

impl HtmlPageExtractor {
    /// Create a new extractor
    pub fn new(timeout: Duration) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; StoryRecommender/1.0)")
            .build()
            .map_err(|e| NewsError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageExtractor for HtmlPageExtractor {
    #[instrument(skip(self))]
    async fn extract(&self, url: &str) -> Result<ArticleContent, NewsError> {
        let parsed = url::Url::parse(url)
            .map_err(|e| NewsError::InvalidConfig(format!("Invalid URL {}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NewsError::InvalidConfig(format!(
                "Unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NewsError::ApiError {
                status: response.status().as_u16(),
                message: format!("Failed to fetch {}", url),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        let content = extract_article(&html, url)?;
        debug!("Extracted {} chars from {}", content.text.len(), url);
        Ok(content)
    }
}

/// Extract article text from an HTML document
///
/// Strategies, in order:
/// - paragraphs inside a known content container
/// - every paragraph under `body`
/// - all text under `body`
pub fn extract_article(html: &str, url: &str) -> Result<ArticleContent, NewsError> {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| clean_text(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let paragraph = Selector::parse("p").ok();

    let from_containers = CONTENT_SELECTORS.iter().find_map(|selector_str| {
        let selector = Selector::parse(selector_str).ok()?;
        let container = document.select(&selector).next()?;
        let text = match &paragraph {
            Some(p) => join_paragraphs(container.select(p).map(|el| el.text().collect::<String>())),
            None => String::new(),
        };
        let text = if text.is_empty() {
            clean_text(&container.text().collect::<String>())
        } else {
            text
        };
        (text.chars().count() >= MIN_TEXT_CHARS).then_some(text)
    });

    let text = from_containers
        .or_else(|| {
            let p = paragraph.as_ref()?;
            let text = join_paragraphs(document.select(p).map(|el| el.text().collect::<String>()));
            (!text.is_empty()).then_some(text)
        })
        .or_else(|| {
            let body = Selector::parse("body").ok()?;
            let text = document
                .select(&body)
                .map(|el| clean_text(&el.text().collect::<String>()))
                .collect::<Vec<_>>()
                .join("\n");
            (!text.is_empty()).then_some(text)
        })
        .ok_or_else(|| NewsError::ExtractionFailed(format!("No article text found at {}", url)))?;

    Ok(ArticleContent {
        url: url.to_string(),
        title,
        text,
    })
}

fn join_paragraphs(paragraphs: impl Iterator<Item = String>) -> String {
    paragraphs
        .map(|p| clean_text(&p))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse runs of whitespace into single spaces
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
