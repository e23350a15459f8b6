//! Error types for the news module

use thiserror::Error;

/// Errors that can occur while fetching feeds or article pages
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed (includes timeouts)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Remote server returned a non-success status
    #[error("HTTP error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// What was being fetched
        message: String,
    },

    /// Body was neither RSS nor Atom
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No usable article text could be extracted
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Invalid configuration or input URL
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
