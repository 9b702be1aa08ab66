// Test dependencies - mock implementations for testing
//
// Provides mock USAJobs and GitHub services that can be injected into
// TrackerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use github_client::{CommitItem, GithubError, Organization, PullRequest, Repository};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use usajobs_client::SearchResultItem;

use super::{BaseCodeHost, BaseJobSearch, TrackerDeps};

// =============================================================================
// Mock Job Search
// =============================================================================

pub struct MockJobSearch {
    items: Arc<Mutex<Vec<SearchResultItem>>>,
    failure: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockJobSearch {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_items(self, items: Vec<SearchResultItem>) -> Self {
        *self.items.lock().unwrap() = items;
        self
    }

    /// Every search fails with this message
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Series that were searched
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockJobSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseJobSearch for MockJobSearch {
    async fn search_series(&self, series: &str) -> Result<Vec<SearchResultItem>> {
        self.calls.lock().unwrap().push(series.to_string());
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }
        Ok(self.items.lock().unwrap().clone())
    }
}

// =============================================================================
// Mock Code Host
// =============================================================================

/// Failure a mock endpoint should produce. `GithubError` wraps reqwest errors
/// and cannot be cloned, so mocks rebuild it on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    NotFound,
    Conflict,
    RateLimited,
    Server(u16),
}

impl MockFailure {
    fn to_error(self, path: &str) -> GithubError {
        match self {
            MockFailure::NotFound => GithubError::NotFound {
                path: path.to_string(),
            },
            MockFailure::Conflict => GithubError::Conflict {
                path: path.to_string(),
            },
            MockFailure::RateLimited => GithubError::RateLimited { reset_at: None },
            MockFailure::Server(status) => GithubError::Api {
                status,
                message: format!("mock failure for {}", path),
            },
        }
    }
}

#[derive(Default)]
struct MockOrg {
    public_repos: u64,
    repos: Vec<String>,
}

/// In-memory GitHub. Unknown organizations answer 404; unknown repositories
/// have no commits and no pull requests.
#[derive(Default)]
pub struct MockCodeHost {
    orgs: HashMap<String, MockOrg>,
    org_failures: HashMap<String, MockFailure>,
    commits: HashMap<(String, String), Vec<CommitItem>>,
    pulls: HashMap<(String, String), Vec<PullRequest>>,
    repo_failures: HashMap<(String, String), MockFailure>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockCodeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an organization with repositories (most recently updated first)
    pub fn with_org(mut self, org: &str, repos: &[&str]) -> Self {
        self.orgs.insert(
            org.to_string(),
            MockOrg {
                public_repos: repos.len() as u64,
                repos: repos.iter().map(|r| r.to_string()).collect(),
            },
        );
        self
    }

    pub fn with_org_failure(mut self, org: &str, failure: MockFailure) -> Self {
        self.org_failures.insert(org.to_string(), failure);
        self
    }

    pub fn with_commits(mut self, org: &str, repo: &str, commits: Vec<CommitItem>) -> Self {
        self.commits.insert(key(org, repo), commits);
        self
    }

    pub fn with_pulls(mut self, org: &str, repo: &str, pulls: Vec<PullRequest>) -> Self {
        self.pulls.insert(key(org, repo), pulls);
        self
    }

    /// Commit and pull request listings for this repository fail
    pub fn with_repo_failure(mut self, org: &str, repo: &str, failure: MockFailure) -> Self {
        self.repo_failures.insert(key(org, repo), failure);
        self
    }

    /// Request paths in call order, e.g. `commits usds/login`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn repo_failure(&self, owner: &str, repo: &str, path: &str) -> Option<GithubError> {
        self.repo_failures
            .get(&key(owner, repo))
            .map(|failure| failure.to_error(path))
    }
}

fn key(org: &str, repo: &str) -> (String, String) {
    (org.to_string(), repo.to_string())
}

#[async_trait]
impl BaseCodeHost for MockCodeHost {
    async fn organization(&self, org: &str) -> Result<Organization, GithubError> {
        let path = format!("/orgs/{}", org);
        self.record(format!("org {}", org));

        if let Some(failure) = self.org_failures.get(org) {
            return Err(failure.to_error(&path));
        }
        match self.orgs.get(org) {
            Some(mock) => Ok(Organization {
                login: org.to_string(),
                public_repos: mock.public_repos,
            }),
            None => Err(GithubError::NotFound { path }),
        }
    }

    async fn repositories(&self, org: &str) -> Result<Vec<Repository>, GithubError> {
        self.record(format!("repos {}", org));
        let mock = self.orgs.get(org).ok_or_else(|| GithubError::NotFound {
            path: format!("/orgs/{}/repos", org),
        })?;

        Ok(mock
            .repos
            .iter()
            .map(|name| Repository {
                name: name.clone(),
                html_url: Some(format!("https://github.com/{}/{}", org, name)),
                archived: false,
            })
            .collect())
    }

    async fn commits_since(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitItem>, GithubError> {
        self.record(format!("commits {}/{}", owner, repo));
        if let Some(e) = self.repo_failure(owner, repo, &format!("/repos/{}/{}/commits", owner, repo)) {
            return Err(e);
        }

        // The real endpoint filters server-side
        Ok(self
            .commits
            .get(&key(owner, repo))
            .map(|commits| {
                commits
                    .iter()
                    .filter(|c| c.authored_at().map(|at| at >= since).unwrap_or(true))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<PullRequest>, GithubError> {
        self.record(format!("pulls {}/{}", owner, repo));
        if let Some(e) = self.repo_failure(owner, repo, &format!("/repos/{}/{}/pulls", owner, repo)) {
            return Err(e);
        }
        Ok(self.pulls.get(&key(owner, repo)).cloned().unwrap_or_default())
    }
}

// =============================================================================
// TestDependencies builder
// =============================================================================

pub struct TestDependencies {
    pub job_search: Arc<MockJobSearch>,
    pub code_host: Arc<MockCodeHost>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            job_search: Arc::new(MockJobSearch::new()),
            code_host: Arc::new(MockCodeHost::new()),
        }
    }

    pub fn with_job_search(mut self, job_search: MockJobSearch) -> Self {
        self.job_search = Arc::new(job_search);
        self
    }

    pub fn with_code_host(mut self, code_host: MockCodeHost) -> Self {
        self.code_host = Arc::new(code_host);
        self
    }

    /// Build TrackerDeps backed by these mocks (the mocks stay inspectable)
    pub fn deps(&self) -> TrackerDeps {
        TrackerDeps::new(self.job_search.clone(), self.code_host.clone())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
