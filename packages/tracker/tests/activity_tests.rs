//! GitHub activity collection against an in-memory code host.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use github_client::{CommitAuthor, CommitDetail, CommitItem, GithubUser, PullRequest};
use tempfile::TempDir;
use tracker_core::domains::activity::activities::ACTIVITY_FILE;
use tracker_core::domains::activity::{
    fetch_org_activity, run_activity, ActivityLevel, ActivitySummary, Agency,
};
use tracker_core::common::read_json;
use tracker_core::kernel::{MockCodeHost, MockFailure};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 6, 0, 0).unwrap()
}

fn commit(sha: &str, message: &str, days_ago: i64) -> CommitItem {
    CommitItem {
        sha: sha.to_string(),
        html_url: format!("https://github.com/usds/site/commit/{}", sha),
        commit: CommitDetail {
            message: message.to_string(),
            author: Some(CommitAuthor {
                name: Some("Grace Hopper".to_string()),
                date: Some(now() - Duration::days(days_ago)),
            }),
        },
    }
}

fn commits(n: usize) -> Vec<CommitItem> {
    (0..n)
        .map(|i| commit(&format!("{:040}", i), "Routine update", 1))
        .collect()
}

fn pull(number: u64, title: &str, days_ago: i64) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        html_url: format!("https://github.com/usds/site/pull/{}", number),
        state: "open".to_string(),
        created_at: now() - Duration::days(days_ago),
        user: Some(GithubUser {
            login: "octocat".to_string(),
        }),
    }
}

fn repo_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("repo-{:02}", i)).collect()
}

#[tokio::test]
async fn test_commits_and_prs_are_counted_per_day() {
    let long_message = format!("{}\n\nbody text", "x".repeat(120));
    let host = MockCodeHost::new()
        .with_org("usds", &["site"])
        .with_commits(
            "usds",
            "site",
            vec![
                commit("abcdef1234567890", &long_message, 2),
                commit("1234567abcdef", "Fix typo", 2),
                commit("fedcba", "Ancient history", 90),
            ],
        )
        .with_pulls(
            "usds",
            "site",
            vec![pull(7, "Add page", 3), pull(3, "Old change", 45)],
        );

    let activity = fetch_org_activity(&host, "usds", now(), 30).await.unwrap();

    assert!(activity.exists);
    assert_eq!(activity.total_repos, 1);
    assert_eq!(activity.total_commits, 2);
    assert_eq!(activity.total_prs, 1);
    assert_eq!(activity.active_repos, 1);
    assert_eq!(activity.daily_activity.len(), 30);

    let two_days_ago = NaiveDate::from_ymd_opt(2025, 10, 13).unwrap();
    let day = &activity.daily_activity[&two_days_ago];
    assert_eq!(day.commits, 2);
    assert_eq!(day.total, 2);
    assert_eq!(day.commit_links[0].sha, "abcdef1");
    assert_eq!(day.commit_links[0].message.chars().count(), 80);
    assert_eq!(day.commit_links[0].author, "Grace Hopper");
    assert_eq!(day.commit_links[0].repo_url, "https://github.com/usds/site");

    let pr_day = &activity.daily_activity[&NaiveDate::from_ymd_opt(2025, 10, 12).unwrap()];
    assert_eq!(pr_day.pr_links[0].number, 7);
    assert_eq!(pr_day.pr_links[0].author, "octocat");

    assert_eq!(activity.last_activity, Some(two_days_ago));
}

#[tokio::test]
async fn test_missing_org_is_not_an_error() {
    let host = MockCodeHost::new();
    let activity = fetch_org_activity(&host, "renamed-org", now(), 30).await.unwrap();

    assert!(!activity.exists);
    assert_eq!(activity.level(), ActivityLevel::Dead);
    assert_eq!(host.calls(), vec!["org renamed-org"]);
}

#[tokio::test]
async fn test_empty_repository_counts_as_inactive() {
    let host = MockCodeHost::new()
        .with_org("nasa", &["empty", "busy"])
        .with_repo_failure("nasa", "empty", MockFailure::Conflict)
        .with_commits("nasa", "busy", commits(3));

    let activity = fetch_org_activity(&host, "nasa", now(), 30).await.unwrap();

    assert_eq!(activity.repos_checked, 2);
    assert_eq!(activity.active_repos, 1);
    assert_eq!(activity.total_commits, 3);
}

#[tokio::test]
async fn test_rate_limit_aborts_org() {
    let host = MockCodeHost::new()
        .with_org("nasa", &["busy"])
        .with_repo_failure("nasa", "busy", MockFailure::RateLimited);

    assert!(fetch_org_activity(&host, "nasa", now(), 30).await.is_err());
}

#[tokio::test]
async fn test_stops_after_consecutive_inactive_repos() {
    let names = repo_names(20);
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let host = MockCodeHost::new()
        .with_org("usgs", &refs)
        .with_commits("usgs", "repo-00", commits(2));

    let activity = fetch_org_activity(&host, "usgs", now(), 30).await.unwrap();

    // One active repo, then inactive ones until more than ten were checked
    assert_eq!(activity.repos_checked, 11);
    let calls = host.calls();
    assert!(calls.contains(&"commits usgs/repo-10".to_string()));
    assert!(!calls.contains(&"commits usgs/repo-11".to_string()));
}

#[tokio::test]
async fn test_keeps_going_while_repos_are_active() {
    let names = repo_names(15);
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut host = MockCodeHost::new().with_org("cfpb", &refs);
    for name in &names {
        host = host.with_commits("cfpb", name, commits(1));
    }

    let activity = fetch_org_activity(&host, "cfpb", now(), 30).await.unwrap();

    assert_eq!(activity.repos_checked, 15);
    assert_eq!(activity.active_repos, 15);
    // Only the ten most active are kept
    assert_eq!(activity.top_active_repos.len(), 10);
}

#[tokio::test]
async fn test_top_repos_sorted_by_activity() {
    let host = MockCodeHost::new()
        .with_org("fda", &["quiet", "loud", "medium"])
        .with_commits("fda", "quiet", commits(1))
        .with_commits("fda", "loud", commits(9))
        .with_commits("fda", "medium", commits(4))
        .with_pulls("fda", "medium", vec![pull(1, "Docs", 1)]);

    let activity = fetch_org_activity(&host, "fda", now(), 30).await.unwrap();

    let order: Vec<&str> = activity
        .top_active_repos
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(order, vec!["loud", "medium", "quiet"]);
    assert_eq!(activity.top_active_repos[1].total_activity, 5);
    assert_eq!(activity.top_active_repos[1].html_url, "https://github.com/fda/medium");
}

#[tokio::test]
async fn test_run_writes_summary_with_matrix() {
    let dir = TempDir::new().unwrap();
    let agencies = [
        Agency { name: "United States Digital Service", org: "usds" },
        Agency { name: "Department of Energy", org: "DeptOfEnergy" },
        Agency { name: "Renamed Agency", org: "gone" },
    ];
    let host = MockCodeHost::new()
        .with_org("usds", &["site"])
        .with_commits("usds", "site", commits(25))
        .with_org("DeptOfEnergy", &["tools"]);

    let outcome = run_activity(&host, &agencies, dir.path(), 30, now()).await.unwrap();

    assert!(outcome.is_ok(), "{:?}", outcome.violations);
    assert_eq!(outcome.path, dir.path().join(ACTIVITY_FILE));

    let summary: ActivitySummary = read_json(&outcome.path).unwrap();
    assert_eq!(summary.total_agencies, 3);
    assert_eq!(summary.active_agencies, 1);
    assert_eq!(summary.total_commits, 25);
    assert_eq!(summary.accessible_agencies(), 2);
    assert_eq!(
        summary.agencies["United States Digital Service"].activity_level,
        ActivityLevel::Medium
    );
    assert!(!summary.agencies["Renamed Agency"].exists);

    let yesterday = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
    assert_eq!(summary.matrix.get("United States Digital Service", yesterday), Some(25));
    assert_eq!(summary.matrix.get("Department of Energy", yesterday), Some(0));
    assert_eq!(summary.records.len(), 1);
}

#[tokio::test]
async fn test_run_fails_on_upstream_error() {
    let dir = TempDir::new().unwrap();
    let agencies = [
        Agency { name: "NASA", org: "nasa" },
        Agency { name: "USGS", org: "usgs" },
    ];
    let host = MockCodeHost::new()
        .with_org("nasa", &[])
        .with_org_failure("usgs", MockFailure::Server(502));

    let err = run_activity(&host, &agencies, dir.path(), 30, now())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("USGS (usgs)"));
    assert!(!dir.path().join(ACTIVITY_FILE).exists());
}
