//! Business logic services for the Story Recommender
//!
//! This crate owns the shared story cache, the TF-IDF similarity ranker
//! and the recommendation service that ties them together.

pub mod config;
pub mod recommendation_service;
pub mod similarity;
pub mod stopwords;
pub mod story_cache;
pub mod vectorizer;

pub use config::{RecommenderConfig, DEFAULT_FEED_URL};
pub use recommendation_service::{RecommendRequest, RecommendationService};
pub use similarity::{cosine_similarity, RankOutcome, ScoredStory, SimilarityRanker};
pub use stopwords::ENGLISH_STOP_WORDS;
pub use story_cache::{source_key, StoryCache};
pub use vectorizer::{TfidfMatrix, TfidfVectorizer, VectorizeError};
