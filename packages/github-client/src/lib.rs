//! Pure GitHub REST API client.
//!
//! Covers the handful of read-only endpoints needed to measure public
//! organization activity: organization metadata, repository listing, recent
//! commits and pull requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_client::GithubClient;
//!
//! let client = GithubClient::new(std::env::var("GITHUB_TOKEN").ok())?;
//! let org = client.get_org("usds").await?;
//! println!("{} public repos", org.public_repos);
//! ```

pub mod error;
pub mod types;

pub use error::{GithubError, Result};
pub use types::{
    CommitAuthor, CommitDetail, CommitItem, GithubUser, Organization, PullRequest, Repository,
};

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "Federal-Agency-Tracker";
const PER_PAGE: &str = "100";

pub struct GithubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GithubClient {
    /// Anonymous access works but is limited to 60 requests per hour.
    ///
    /// A blank token means anonymous. A token with embedded whitespace or
    /// control characters cannot be sent as a header and is rejected.
    pub fn new(token: Option<String>) -> Result<Self> {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if let Some(t) = &token {
            if t.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(GithubError::Config(
                    "GitHub token contains whitespace or control characters".into(),
                ));
            }
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            token,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub async fn get_org(&self, org: &str) -> Result<Organization> {
        self.get_json(&format!("/orgs/{}", org), &[]).await
    }

    /// Most recently updated repositories first (first page only).
    pub async fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>> {
        self.get_json(
            &format!("/orgs/{}/repos", org),
            &[("per_page", PER_PAGE), ("sort", "updated")],
        )
        .await
    }

    pub async fn list_commits_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitItem>> {
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        self.get_json(
            &format!("/repos/{}/{}/commits", owner, repo),
            &[("since", since.as_str()), ("per_page", PER_PAGE)],
        )
        .await
    }

    /// Pull requests in every state. The endpoint has no `since` filter, so
    /// callers filter on `created_at` themselves.
    pub async fn list_pulls(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>> {
        self.get_json(
            &format!("/repos/{}/{}/pulls", owner, repo),
            &[("state", "all"), ("per_page", PER_PAGE)],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .query(query);

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        tracing::debug!(path, "GitHub request");
        let resp = request.send().await?;
        let resp = check_status(path, resp).await?;

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

async fn check_status(path: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    match status {
        StatusCode::NOT_FOUND => Err(GithubError::NotFound {
            path: path.to_string(),
        }),
        StatusCode::CONFLICT => Err(GithubError::Conflict {
            path: path.to_string(),
        }),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
            if rate_limit_exhausted(header_str(&resp, "x-ratelimit-remaining")) =>
        {
            let reset_at = header_str(&resp, "x-ratelimit-reset").and_then(|v| v.parse().ok());
            Err(GithubError::RateLimited { reset_at })
        }
        _ => {
            let body = resp.text().await.unwrap_or_default();
            Err(GithubError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

fn header_str<'a>(resp: &'a Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

fn rate_limit_exhausted(remaining: Option<&str>) -> bool {
    remaining.map(|v| v.trim() == "0").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_anonymous() {
        let client = GithubClient::new(Some("  ".into())).unwrap();
        assert!(!client.is_authenticated());

        let client = GithubClient::new(Some("ghp_abc".into())).unwrap();
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_malformed_token_is_config_error() {
        let err = GithubClient::new(Some("ghp_abc\ndef".into())).err().unwrap();
        assert!(matches!(err, GithubError::Config(_)));

        // Surrounding whitespace from .env files is trimmed
        assert!(GithubClient::new(Some(" ghp_abc\n".into())).unwrap().is_authenticated());
    }

    #[test]
    fn test_rate_limit_header_parsing() {
        assert!(rate_limit_exhausted(Some("0")));
        assert!(!rate_limit_exhausted(Some("12")));
        assert!(!rate_limit_exhausted(None));
    }

    #[test]
    fn test_skippable_errors() {
        assert!(GithubError::NotFound { path: "/orgs/x".into() }.is_skippable());
        assert!(GithubError::Conflict { path: "/repos/x/y/commits".into() }.is_skippable());
        assert!(!GithubError::RateLimited { reset_at: None }.is_skippable());
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let client = GithubClient::new(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let err = tokio_test::block_on(client.get_org("usds")).err().unwrap();
        assert!(matches!(err, GithubError::Network(_)));
        assert!(!err.is_skippable());
    }
}
