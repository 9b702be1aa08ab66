use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ActivityLevel, ActivityRecord, DayActivity, OrgActivity, RepoActivity};
use crate::domains::activity::agencies::Agency;
use crate::domains::activity::matrix::{activity_window, ActivityMatrix};

/// Per-agency entry of `github_activity.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencySummary {
    pub org_name: String,
    pub activity_level: ActivityLevel,
    pub repos: u64,
    #[serde(default)]
    pub active_repos: usize,
    #[serde(default)]
    pub top_active_repos: Vec<RepoActivity>,
    pub commits: u64,
    pub prs: u64,
    pub last_activity: Option<NaiveDate>,
    #[serde(default)]
    pub last_activity_days: Option<i64>,
    pub daily_activity: BTreeMap<NaiveDate, DayActivity>,
    pub exists: bool,
}

impl AgencySummary {
    pub fn from_activity(activity: &OrgActivity, today: NaiveDate) -> Self {
        if !activity.exists {
            return Self {
                org_name: activity.org.clone(),
                activity_level: ActivityLevel::Dead,
                repos: 0,
                active_repos: 0,
                top_active_repos: Vec::new(),
                commits: 0,
                prs: 0,
                last_activity: None,
                last_activity_days: None,
                daily_activity: BTreeMap::new(),
                exists: false,
            };
        }

        Self {
            org_name: activity.org.clone(),
            activity_level: activity.level(),
            repos: activity.total_repos,
            active_repos: activity.active_repos,
            top_active_repos: activity.top_active_repos.clone(),
            commits: activity.total_commits,
            prs: activity.total_prs,
            last_activity: activity.last_activity,
            last_activity_days: activity
                .last_activity
                .map(|last| (today - last).num_days().max(0)),
            daily_activity: activity.daily_activity.clone(),
            exists: true,
        }
    }
}

/// The published `github_activity.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub generated_at: DateTime<Utc>,
    /// Length of the look-back window
    pub days: i64,
    pub agencies: BTreeMap<String, AgencySummary>,
    pub total_agencies: usize,
    pub active_agencies: usize,
    pub total_commits: u64,
    pub total_prs: u64,
    pub records: Vec<ActivityRecord>,
    pub matrix: ActivityMatrix,
}

impl ActivitySummary {
    /// Roll per-organization results up into the published document.
    ///
    /// `results` is in reporting order; the matrix rows follow it.
    pub fn build(results: &[(Agency, OrgActivity)], generated_at: DateTime<Utc>, days: i64) -> Self {
        let today = generated_at.date_naive();
        let mut agencies = BTreeMap::new();
        let mut records = Vec::new();
        let mut active_agencies = 0;
        let mut total_commits = 0;
        let mut total_prs = 0;

        for (agency, activity) in results {
            let summary = AgencySummary::from_activity(activity, today);
            if summary.exists {
                if summary.activity_level != ActivityLevel::Dead {
                    active_agencies += 1;
                }
                total_commits += summary.commits;
                total_prs += summary.prs;
                records.extend(activity.records(agency.name));
            }
            agencies.insert(agency.name.to_string(), summary);
        }

        let names: Vec<&str> = results.iter().map(|(agency, _)| agency.name).collect();
        let matrix = ActivityMatrix::build(&records, &activity_window(today, days), &names);

        Self {
            generated_at,
            days,
            total_agencies: agencies.len(),
            agencies,
            active_agencies,
            total_commits,
            total_prs,
            records,
            matrix,
        }
    }

    /// Agencies whose organization could be read.
    pub fn accessible_agencies(&self) -> usize {
        self.agencies.values().filter(|a| a.exists).count()
    }
}
