use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The most recent posting that still used the "IT Specialist" title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostRecentPosting {
    pub title: Option<String>,
    pub date_posted: Option<NaiveDate>,
    pub link: Option<String>,
}

/// Summary figures for one run, published as `2210_metrics.json`.
///
/// Serialized field names are read by the dashboard and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub generated_at: DateTime<Utc>,

    #[serde(rename = "total_2210_jobs")]
    pub total_jobs: u64,

    #[serde(rename = "it_specialist_jobs")]
    pub it_specialist_count: u64,

    /// Share of IT Specialist titles, 0-100, one decimal
    #[serde(rename = "it_specialist_percentage")]
    pub percentage: f64,

    #[serde(rename = "days_since_last_it_specialist")]
    pub days_since_last_it_specialist: Option<i64>,

    #[serde(rename = "other_bad_titles")]
    pub example_non_compliant_titles: Vec<String>,

    #[serde(rename = "compliant_jobs", default)]
    pub compliant_count: u64,

    #[serde(default)]
    pub most_recent_it_specialist: MostRecentPosting,

    /// Newest posting date among titles classified compliant
    #[serde(default)]
    pub latest_compliant_posting: Option<NaiveDate>,

    #[serde(default)]
    pub data_filter: String,
}

impl MetricsSnapshot {
    /// Date of the last IT Specialist posting: the recorded one, otherwise
    /// derived from `days_since_last_it_specialist` and `generated_at`.
    pub fn last_it_specialist_posting_date(&self) -> Option<NaiveDate> {
        self.most_recent_it_specialist.date_posted.or_else(|| {
            self.days_since_last_it_specialist
                .map(|days| self.generated_at.date_naive() - Duration::days(days))
        })
    }

    /// Figures only, ignoring `generated_at`.
    pub fn same_figures(&self, other: &MetricsSnapshot) -> bool {
        let mut other = other.clone();
        other.generated_at = self.generated_at;
        *self == other
    }
}
