//! Error types for the application

use thiserror::Error;

/// Result type alias using our WatchError
pub type Result<T> = std::result::Result<T, WatchError>;

/// Main error type for watch operations
#[derive(Error, Debug)]
pub enum WatchError {
    /// HTTP request errors (connect, redirect loop, body read)
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Source site answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Fetch exceeded its time budget
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// User supplied something we cannot act on
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single extractor failed on a document
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Alert could not be delivered
    #[error("Notification error: {0}")]
    Notification(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Channel send errors
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WatchError {
    /// True for failures of the fetch primitive (network, timeout, HTTP status)
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            WatchError::HttpRequest(_) | WatchError::HttpStatus { .. } | WatchError::Timeout(_)
        )
    }
}
