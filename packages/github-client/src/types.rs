use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /orgs/{org}`
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub login: String,
    #[serde(default)]
    pub public_repos: u64,
}

/// Entry of `GET /orgs/{org}/repos`
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub html_url: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

/// Entry of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Clone, Deserialize)]
pub struct CommitItem {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Entry of `GET /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub user: Option<GithubUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubUser {
    pub login: String,
}

impl CommitItem {
    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|a| a.date)
    }

    pub fn author_name(&self) -> &str {
        self.commit
            .author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap_or("unknown")
    }

    /// First line of the commit message.
    pub fn headline(&self) -> &str {
        self.commit.message.lines().next().unwrap_or("")
    }
}

impl PullRequest {
    pub fn author_login(&self) -> &str {
        self.user.as_ref().map(|u| u.login.as_str()).unwrap_or("unknown")
    }
}
