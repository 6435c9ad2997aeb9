//! Error types for the crawler

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlerError {
    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP status {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing cookies: {0} must be set (see .env)")]
    MissingCookies(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CrawlerError {
    /// Whether a failed request is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CrawlerError::Network(_) | CrawlerError::Http { .. })
    }
}

impl From<config::ConfigError> for CrawlerError {
    fn from(err: config::ConfigError) -> Self {
        CrawlerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CrawlerError>;
