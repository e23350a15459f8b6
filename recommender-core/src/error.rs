//! Error types for the recommender

use thiserror::Error;

/// Recommender-wide error type
#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No stories available")]
    NoStoriesAvailable,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RecommenderError {
    pub fn validation(msg: impl Into<String>) -> Self {
        RecommenderError::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        RecommenderError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        RecommenderError::Internal(msg.into())
    }

    /// Whether the caller sent something unusable (as opposed to a server-side condition)
    pub fn is_client_error(&self) -> bool {
        matches!(self, RecommenderError::Validation(_))
    }
}

/// Result type alias for recommender operations
pub type RecommenderResult<T> = Result<T, RecommenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(RecommenderError::validation("missing text").is_client_error());
        assert!(!RecommenderError::NoStoriesAvailable.is_client_error());
        assert!(!RecommenderError::internal("boom").is_client_error());
    }

    #[test]
    fn test_display() {
        let err = RecommenderError::validation("Missing 'text' field");
        assert_eq!(err.to_string(), "Validation error: Missing 'text' field");
        assert_eq!(
            RecommenderError::NoStoriesAvailable.to_string(),
            "No stories available"
        );
    }
}
