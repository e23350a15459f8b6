//! Core types for the Story Recommender
//!
//! This crate defines the shared data structures used across the recommender,
//! including the story representation, the public recommendation projection,
//! and the crate-wide error type.

pub mod error;
pub mod story;

pub use error::{RecommenderError, RecommenderResult};
pub use story::{
    CacheStatus, Recommendation, Story, MAX_DESCRIPTION_CHARS, MAX_KEYWORDS, UNTITLED,
};
