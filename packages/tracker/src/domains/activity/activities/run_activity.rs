use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::fetch_org_activity::fetch_org_activity;
use crate::common::write_json_atomic;
use crate::domains::activity::agencies::Agency;
use crate::domains::activity::models::ActivitySummary;
use crate::domains::integrity::{check_activity_document, Violation};
use crate::kernel::BaseCodeHost;

pub const ACTIVITY_FILE: &str = "github_activity.json";

/// Share of agencies that must be reachable before the run warns about
/// renamed or private organizations.
const MIN_ACCESSIBLE_SHARE: f64 = 0.8;

#[derive(Debug)]
pub struct ActivityRunOutcome {
    pub summary: ActivitySummary,
    pub path: PathBuf,
    /// Shape problems in the written document
    pub violations: Vec<Violation>,
}

impl ActivityRunOutcome {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Fetch activity for every agency and publish `github_activity.json`.
///
/// A missing organization is recorded and the run continues. Any other
/// failure for any agency fails the whole run and nothing is written.
pub async fn run_activity(
    host: &dyn BaseCodeHost,
    agencies: &[Agency],
    output_dir: &Path,
    days: i64,
    now: DateTime<Utc>,
) -> Result<ActivityRunOutcome> {
    info!(agencies = agencies.len(), days, "Fetching GitHub activity");

    let mut results = Vec::with_capacity(agencies.len());
    let mut failed = Vec::new();

    for (i, agency) in agencies.iter().enumerate() {
        info!(
            "[{}/{}] Fetching activity for {} ({})",
            i + 1,
            agencies.len(),
            agency.name,
            agency.org
        );
        match fetch_org_activity(host, agency.org, now, days).await {
            Ok(activity) => results.push((*agency, activity)),
            Err(e) => {
                error!(agency = %agency.name, org = %agency.org, error = %e, "Failed to fetch activity");
                failed.push(format!("{} ({})", agency.name, agency.org));
            }
        }
    }

    if !failed.is_empty() {
        bail!("Failed to fetch data for agencies: {}", failed.join(", "));
    }

    let summary = ActivitySummary::build(&results, now, days);

    let path = output_dir.join(ACTIVITY_FILE);
    write_json_atomic(&path, &summary)?;

    let document = serde_json::to_value(&summary).context("Failed to serialize activity summary")?;
    let violations = check_activity_document(&document);

    let accessible = summary.accessible_agencies();
    if (accessible as f64) < agencies.len() as f64 * MIN_ACCESSIBLE_SHARE {
        warn!(
            "Only {}/{} agencies accessible - check for org name changes",
            accessible,
            agencies.len()
        );
    }

    info!(
        path = %path.display(),
        accessible,
        active = summary.active_agencies,
        commits = summary.total_commits,
        prs = summary.total_prs,
        "Activity summary written"
    );

    Ok(ActivityRunOutcome {
        summary,
        path,
        violations,
    })
}
