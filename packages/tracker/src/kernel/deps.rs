//! Tracker dependencies (using traits for testability)
//!
//! The runs only ever talk to USAJobs and GitHub through the `Base*` traits;
//! this module wires the real clients behind them.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use github_client::{
    CommitItem, GithubClient, GithubError, Organization, PullRequest, Repository,
};
use std::sync::Arc;
use usajobs_client::{SearchQuery, SearchResultItem, UsaJobsClient};

use crate::config::Config;
use crate::kernel::{BaseCodeHost, BaseJobSearch};

// =============================================================================
// UsaJobsClient Adapter (implements BaseJobSearch trait)
// =============================================================================

/// Wrapper around UsaJobsClient that implements BaseJobSearch trait
pub struct UsaJobsAdapter(pub Arc<UsaJobsClient>);

impl UsaJobsAdapter {
    pub fn new(client: Arc<UsaJobsClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseJobSearch for UsaJobsAdapter {
    async fn search_series(&self, series: &str) -> Result<Vec<SearchResultItem>> {
        let query = SearchQuery::for_series(series);
        self.0
            .search_all(&query)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("USAJobs search for series {} failed", series))
    }
}

// =============================================================================
// GithubClient Adapter (implements BaseCodeHost trait)
// =============================================================================

/// Wrapper around GithubClient that implements BaseCodeHost trait
pub struct GithubAdapter(pub Arc<GithubClient>);

impl GithubAdapter {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseCodeHost for GithubAdapter {
    async fn organization(&self, org: &str) -> Result<Organization, GithubError> {
        self.0.get_org(org).await
    }

    async fn repositories(&self, org: &str) -> Result<Vec<Repository>, GithubError> {
        self.0.list_org_repos(org).await
    }

    async fn commits_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitItem>, GithubError> {
        self.0.list_commits_since(owner, repo, since).await
    }

    async fn pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<PullRequest>, GithubError> {
        self.0.list_pulls(owner, repo).await
    }
}

// =============================================================================
// TrackerDeps
// =============================================================================

/// Dependencies accessible to the runs (using traits for testability)
#[derive(Clone)]
pub struct TrackerDeps {
    pub job_search: Arc<dyn BaseJobSearch>,
    pub code_host: Arc<dyn BaseCodeHost>,
}

impl TrackerDeps {
    pub fn new(job_search: Arc<dyn BaseJobSearch>, code_host: Arc<dyn BaseCodeHost>) -> Self {
        Self {
            job_search,
            code_host,
        }
    }

    /// Build the production clients from configuration.
    ///
    /// Fails without a USAJobs key; GitHub falls back to anonymous access.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(job_search_from_config(config)?, code_host_from_config(config)?))
    }
}

pub fn job_search_from_config(config: &Config) -> Result<Arc<dyn BaseJobSearch>> {
    let mut client = UsaJobsClient::new(config.require_usajobs_token()?.to_string())
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to create USAJobs client")?;
    if let Some(agent) = &config.usajobs_user_agent {
        client = client.with_user_agent(agent.clone());
    }
    Ok(Arc::new(UsaJobsAdapter::new(Arc::new(client))))
}

pub fn code_host_from_config(config: &Config) -> Result<Arc<dyn BaseCodeHost>> {
    let client = GithubClient::new(config.github_token.clone())
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to create GitHub client")?;
    if !client.is_authenticated() {
        tracing::warn!("GITHUB_TOKEN not set; GitHub requests are limited to 60 per hour");
    }
    Ok(Arc::new(GithubAdapter::new(Arc::new(client))))
}
