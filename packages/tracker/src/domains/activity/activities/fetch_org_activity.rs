use chrono::{DateTime, Duration, Utc};
use github_client::{CommitItem, GithubError, PullRequest};
use tracing::{debug, info, warn};

use crate::common::truncate_chars;
use crate::domains::activity::matrix::activity_window;
use crate::domains::activity::models::{CommitLink, OrgActivity, PrLink, RepoActivity};
use crate::kernel::BaseCodeHost;

/// Stop walking repositories after this many inactive ones in a row...
pub const MAX_CONSECUTIVE_INACTIVE: usize = 5;
/// ...but only once more than this many have been checked.
pub const MIN_REPOS_CHECKED: usize = 10;
pub const TOP_REPOS: usize = 10;

const LINK_TEXT_MAX: usize = 80;
const SHORT_SHA_LEN: usize = 7;

/// Gather commits and pull requests for one organization over the last
/// `days` days.
///
/// Repositories are visited most recently updated first. An organization
/// that answers 404 is reported as missing rather than failing; a
/// repository that answers 404 or 409 (empty) counts as inactive. Anything
/// else is an error and nothing is returned for the organization.
pub async fn fetch_org_activity(
    host: &dyn BaseCodeHost,
    org: &str,
    now: DateTime<Utc>,
    days: i64,
) -> Result<OrgActivity, GithubError> {
    let org_info = match host.organization(org).await {
        Ok(info) => info,
        Err(GithubError::NotFound { .. }) => {
            warn!(org = %org, "Organization not found");
            return Ok(OrgActivity::missing(org));
        }
        Err(e) => return Err(e),
    };

    let since = now - Duration::days(days);
    let mut activity = OrgActivity::new(org, &activity_window(now.date_naive(), days));
    activity.total_repos = org_info.public_repos;

    let repos = host.repositories(org).await?;
    debug!(org = %org, repos = repos.len(), "Checking repositories for recent activity");

    let mut consecutive_inactive = 0;
    let mut repo_details = Vec::new();

    for repo in &repos {
        let repo_url = format!("https://github.com/{}/{}", org, repo.name);

        let commits = skip_empty(host.commits_since(org, &repo.name, since).await)?;
        let pulls = skip_empty(host.pull_requests(org, &repo.name).await)?;
        // The pulls endpoint has no date filter
        let recent_pulls: Vec<&PullRequest> =
            pulls.iter().filter(|pr| pr.created_at >= since).collect();

        for commit in &commits {
            if let Some(at) = commit.authored_at() {
                activity.add_commit(at.date_naive(), commit_link(commit, &repo.name, &repo_url));
            }
        }
        for pr in &recent_pulls {
            activity.add_pull(pr.created_at.date_naive(), pr_link(pr, &repo.name, &repo_url));
        }

        let repo_commits = commits.len() as u64;
        let repo_prs = recent_pulls.len() as u64;
        activity.total_commits += repo_commits;
        activity.total_prs += repo_prs;
        activity.repos_checked += 1;

        if repo_commits + repo_prs > 0 {
            activity.active_repos += 1;
            consecutive_inactive = 0;
            repo_details.push(RepoActivity {
                name: repo.name.clone(),
                commits: repo_commits,
                prs: repo_prs,
                total_activity: repo_commits + repo_prs,
                html_url: repo_url,
            });
        } else {
            consecutive_inactive += 1;
        }

        if consecutive_inactive >= MAX_CONSECUTIVE_INACTIVE
            && activity.repos_checked > MIN_REPOS_CHECKED
        {
            debug!(
                org = %org,
                checked = activity.repos_checked,
                "Stopping after {} consecutive inactive repositories",
                consecutive_inactive
            );
            break;
        }
    }

    // Stable sort: ties keep visiting order
    repo_details.sort_by(|a, b| b.total_activity.cmp(&a.total_activity));
    repo_details.truncate(TOP_REPOS);
    activity.top_active_repos = repo_details;

    info!(
        org = %org,
        commits = activity.total_commits,
        prs = activity.total_prs,
        active_repos = activity.active_repos,
        "Fetched organization activity"
    );

    Ok(activity)
}

/// 404 and 409 on a repository listing mean "nothing here".
fn skip_empty<T>(result: Result<Vec<T>, GithubError>) -> Result<Vec<T>, GithubError> {
    match result {
        Err(e) if e.is_skippable() => {
            debug!(error = %e, "Skipping repository listing");
            Ok(Vec::new())
        }
        other => other,
    }
}

fn commit_link(commit: &CommitItem, repo_name: &str, repo_url: &str) -> CommitLink {
    CommitLink {
        repo_name: repo_name.to_string(),
        repo_url: repo_url.to_string(),
        html_url: commit.html_url.clone(),
        message: truncate_chars(commit.headline(), LINK_TEXT_MAX),
        author: commit.author_name().to_string(),
        sha: truncate_chars(&commit.sha, SHORT_SHA_LEN),
    }
}

fn pr_link(pr: &PullRequest, repo_name: &str, repo_url: &str) -> PrLink {
    PrLink {
        repo_name: repo_name.to_string(),
        repo_url: repo_url.to_string(),
        html_url: pr.html_url.clone(),
        title: truncate_chars(&pr.title, LINK_TEXT_MAX),
        author: pr.author_login().to_string(),
        number: pr.number,
        state: pr.state.clone(),
    }
}
