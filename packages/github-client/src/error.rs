//! Error types for the GitHub client.

use thiserror::Error;

/// Result type for GitHub client operations.
pub type Result<T> = std::result::Result<T, GithubError>;

/// GitHub client errors.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Missing or invalid client settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 404 - organization or repository does not exist (or is private)
    #[error("not found: {path}")]
    NotFound { path: String },

    /// 409 - typically an empty repository with no commits
    #[error("conflict (empty repository?): {path}")]
    Conflict { path: String },

    /// 403 with an exhausted rate-limit budget
    #[error("rate limit exhausted (resets at {reset_at:?})")]
    RateLimited { reset_at: Option<i64> },

    /// Any other non-2xx response
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GithubError {
    /// Errors that mean "nothing to count here" rather than a broken run.
    pub fn is_skippable(&self) -> bool {
        matches!(self, GithubError::NotFound { .. } | GithubError::Conflict { .. })
    }
}
