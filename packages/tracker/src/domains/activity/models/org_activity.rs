use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Coarse activity bucket shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    High,
    Medium,
    Low,
    Dead,
}

impl ActivityLevel {
    /// Bucket by commits + pull requests in the window. A missing
    /// organization is always `Dead`.
    pub fn from_events(exists: bool, events: u64) -> Self {
        match (exists, events) {
            (false, _) => ActivityLevel::Dead,
            (true, n) if n >= 100 => ActivityLevel::High,
            (true, n) if n >= 20 => ActivityLevel::Medium,
            (true, n) if n >= 5 => ActivityLevel::Low,
            _ => ActivityLevel::Dead,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::High => "high",
            ActivityLevel::Medium => "medium",
            ActivityLevel::Low => "low",
            ActivityLevel::Dead => "dead",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tooltip entry for one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitLink {
    pub repo_name: String,
    pub repo_url: String,
    pub html_url: String,
    /// First line of the message, truncated
    pub message: String,
    pub author: String,
    /// Abbreviated (7 characters)
    pub sha: String,
}

/// Tooltip entry for one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrLink {
    pub repo_name: String,
    pub repo_url: String,
    pub html_url: String,
    pub title: String,
    pub author: String,
    pub number: u64,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    pub commits: u64,
    pub prs: u64,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commit_links: Vec<CommitLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pr_links: Vec<PrLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoActivity {
    pub name: String,
    pub commits: u64,
    pub prs: u64,
    pub total_activity: u64,
    pub html_url: String,
}

/// One agency, one day. The unit the heatmap is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub agency: String,
    pub date: NaiveDate,
    pub commit_count: u64,
    pub pr_count: u64,
}

impl ActivityRecord {
    pub fn total(&self) -> u64 {
        self.commit_count + self.pr_count
    }
}

/// Everything gathered for one GitHub organization in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgActivity {
    pub org: String,
    pub exists: bool,
    /// Public repository count reported by the organization
    pub total_repos: u64,
    pub repos_checked: usize,
    pub active_repos: usize,
    pub total_commits: u64,
    pub total_prs: u64,
    pub top_active_repos: Vec<RepoActivity>,
    /// One entry per day of the window, zero-filled
    pub daily_activity: BTreeMap<NaiveDate, DayActivity>,
    pub last_activity: Option<NaiveDate>,
}

impl OrgActivity {
    pub fn new(org: impl Into<String>, window: &[NaiveDate]) -> Self {
        Self {
            org: org.into(),
            exists: true,
            total_repos: 0,
            repos_checked: 0,
            active_repos: 0,
            total_commits: 0,
            total_prs: 0,
            top_active_repos: Vec::new(),
            daily_activity: window.iter().map(|d| (*d, DayActivity::default())).collect(),
            last_activity: None,
        }
    }

    /// The organization does not exist (or is not public).
    pub fn missing(org: impl Into<String>) -> Self {
        Self {
            exists: false,
            ..Self::new(org, &[])
        }
    }

    pub fn events(&self) -> u64 {
        self.total_commits + self.total_prs
    }

    pub fn level(&self) -> ActivityLevel {
        ActivityLevel::from_events(self.exists, self.events())
    }

    /// Attach a commit to its day. Days outside the window are ignored;
    /// returns whether the commit landed in the window.
    pub fn add_commit(&mut self, date: NaiveDate, link: CommitLink) -> bool {
        let Some(day) = self.daily_activity.get_mut(&date) else {
            return false;
        };
        day.commits += 1;
        day.total += 1;
        day.commit_links.push(link);
        self.touch(date);
        true
    }

    pub fn add_pull(&mut self, date: NaiveDate, link: PrLink) -> bool {
        let Some(day) = self.daily_activity.get_mut(&date) else {
            return false;
        };
        day.prs += 1;
        day.total += 1;
        day.pr_links.push(link);
        self.touch(date);
        true
    }

    fn touch(&mut self, date: NaiveDate) {
        if self.last_activity.map_or(true, |last| date > last) {
            self.last_activity = Some(date);
        }
    }

    /// Days with any activity, oldest first.
    pub fn records(&self, agency: &str) -> Vec<ActivityRecord> {
        self.daily_activity
            .iter()
            .filter(|(_, day)| day.total > 0)
            .map(|(date, day)| ActivityRecord {
                agency: agency.to_string(),
                date: *date,
                commit_count: day.commits,
                pr_count: day.prs,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    fn commit(sha: &str) -> CommitLink {
        CommitLink {
            repo_name: "api".into(),
            repo_url: "https://github.com/usds/api".into(),
            html_url: format!("https://github.com/usds/api/commit/{}", sha),
            message: "Fix build".into(),
            author: "octocat".into(),
            sha: sha.into(),
        }
    }

    #[test]
    fn test_activity_levels() {
        assert_eq!(ActivityLevel::from_events(true, 100), ActivityLevel::High);
        assert_eq!(ActivityLevel::from_events(true, 99), ActivityLevel::Medium);
        assert_eq!(ActivityLevel::from_events(true, 20), ActivityLevel::Medium);
        assert_eq!(ActivityLevel::from_events(true, 5), ActivityLevel::Low);
        assert_eq!(ActivityLevel::from_events(true, 4), ActivityLevel::Dead);
        assert_eq!(ActivityLevel::from_events(false, 500), ActivityLevel::Dead);
        assert_eq!(serde_json::to_string(&ActivityLevel::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_add_commit_inside_and_outside_window() {
        let mut activity = OrgActivity::new("usds", &[day(1), day(2), day(3)]);

        assert!(activity.add_commit(day(2), commit("abc1234")));
        assert!(activity.add_commit(day(1), commit("def5678")));
        assert!(!activity.add_commit(day(9), commit("0000000")));

        assert_eq!(activity.daily_activity[&day(2)].commits, 1);
        assert_eq!(activity.last_activity, Some(day(2)));
        assert_eq!(activity.daily_activity.len(), 3);
    }

    #[test]
    fn test_records_skip_quiet_days() {
        let mut activity = OrgActivity::new("usds", &[day(1), day(2), day(3)]);
        activity.add_commit(day(3), commit("abc1234"));
        activity.add_commit(day(3), commit("abc1235"));

        let records = activity.records("United States Digital Service");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, day(3));
        assert_eq!(records[0].commit_count, 2);
        assert_eq!(records[0].total(), 2);
    }

    #[test]
    fn test_missing_org() {
        let activity = OrgActivity::missing("gone");
        assert!(!activity.exists);
        assert!(activity.daily_activity.is_empty());
        assert_eq!(activity.level(), ActivityLevel::Dead);
    }

    #[test]
    fn test_empty_link_lists_are_omitted() {
        let value = serde_json::to_value(DayActivity::default()).unwrap();
        assert!(value.get("commit_links").is_none());
        assert_eq!(value["total"], 0);
    }
}
