//! Error types for the USAJobs client.

use thiserror::Error;

/// Result type for USAJobs client operations.
pub type Result<T> = std::result::Result<T, UsaJobsError>;

/// USAJobs client errors.
#[derive(Debug, Error)]
pub enum UsaJobsError {
    /// Missing or invalid client settings (empty API key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response from the Search endpoint
    #[error("USAJobs API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
