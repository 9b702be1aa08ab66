// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Classification, aggregation and validation are domain functions that take
// these traits as inputs.
//
// Naming convention: Base* for trait names (e.g., BaseJobSearch, BaseCodeHost)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use github_client::{CommitItem, GithubError, Organization, PullRequest, Repository};
use usajobs_client::SearchResultItem;

// =============================================================================
// Job Search Trait (Infrastructure - USAJobs)
// =============================================================================

#[async_trait]
pub trait BaseJobSearch: Send + Sync {
    /// Fetch every open announcement in an occupational series, all pages.
    async fn search_series(&self, series: &str) -> Result<Vec<SearchResultItem>>;
}

// =============================================================================
// Code Host Trait (Infrastructure - GitHub)
// =============================================================================

/// Errors keep their GitHub shape so callers can tell a missing organization
/// or empty repository apart from an outage.
#[async_trait]
pub trait BaseCodeHost: Send + Sync {
    async fn organization(&self, org: &str) -> Result<Organization, GithubError>;

    /// Repositories, most recently updated first.
    async fn repositories(&self, org: &str) -> Result<Vec<Repository>, GithubError>;

    async fn commits_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitItem>, GithubError>;

    /// Pull requests in every state, unfiltered by date.
    async fn pull_requests(&self, owner: &str, repo: &str)
        -> Result<Vec<PullRequest>, GithubError>;
}
