//! Story ingestion for the recommender
//!
//! This crate provides:
//! - The `FeedSource` abstraction and an RSS/Atom implementation
//! - Conversion of raw feed entries into validated `Story` values
//! - Keyword extraction and single-field HTML cleanup
//! - Best-effort article text extraction from arbitrary pages

pub mod error;
pub mod html;
pub mod keywords;
pub mod page_extractor;
pub mod rss_client;
pub mod types;

pub use error::NewsError;
pub use keywords::{extract_keywords, extract_top_keywords};
pub use page_extractor::{HtmlPageExtractor, PageExtractor};
pub use rss_client::{FeedSource, RssClient, DEFAULT_FEED_TIMEOUT};
pub use types::{ArticleContent, RawEntry};
