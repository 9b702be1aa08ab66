use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{JobRecord, MetricsSnapshot, SkipSummary};

/// Everything one jobs run captured: the records, the derived metrics and
/// what was skipped. Persisted to the history directory and compared against
/// the next run.
///
/// Only snapshots that passed validation serve as the baseline for later
/// runs; a failed one is kept for inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsSnapshot {
    pub generated_at: DateTime<Utc>,
    pub data_filter: String,
    pub series: String,
    pub records: Vec<JobRecord>,
    pub metrics: MetricsSnapshot,
    #[serde(default)]
    pub skipped: SkipSummary,
    /// Snapshots written before this field existed count as passed
    #[serde(default = "passed_by_default")]
    pub passed_validation: bool,
}

fn passed_by_default() -> bool {
    true
}

impl JobsSnapshot {
    pub fn record_ids(&self) -> HashSet<String> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    /// Identifiers still inside the retention horizon as of `as_of`.
    ///
    /// Older postings are expected to expire, so they are not counted as lost.
    /// Without a horizon every identifier is kept.
    pub fn ids_within_retention(
        &self,
        as_of: NaiveDate,
        retention_days: Option<i64>,
    ) -> HashSet<String> {
        let Some(days) = retention_days else {
            return self.record_ids();
        };

        let horizon = as_of - Duration::days(days);
        self.records
            .iter()
            .filter(|r| r.posted_date >= horizon)
            .map(|r| r.id.clone())
            .collect()
    }
}
