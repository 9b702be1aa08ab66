//! Cross-run integrity checks for the jobs snapshot.
//!
//! The validator compares the current run against the previous one and
//! reports every problem it finds. It never repairs data; a failing result is
//! meant to block publication.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::domains::jobs::metrics::percentage;
use crate::domains::jobs::models::MetricsSnapshot;

/// Tolerances for the integrity checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityPolicy {
    /// Fraction of previously seen records that may disappear between runs
    /// (postings expire). Default: 0.05.
    pub max_shrinkage: f64,

    /// How many days the last IT Specialist posting date may move backwards.
    /// Default: 0.
    pub max_date_regression_days: i64,

    /// Postings older than this many days may vanish without counting as
    /// lost. Default: no horizon.
    pub retention_days: Option<i64>,

    /// Upper bound on example titles in a snapshot. Default: 10.
    pub example_cap: usize,
}

impl Default for IntegrityPolicy {
    fn default() -> Self {
        Self {
            max_shrinkage: 0.05,
            max_date_regression_days: 0,
            retention_days: None,
            example_cap: 10,
        }
    }
}

impl IntegrityPolicy {
    pub fn with_max_shrinkage(mut self, fraction: f64) -> Self {
        self.max_shrinkage = fraction;
        self
    }

    pub fn with_max_date_regression_days(mut self, days: i64) -> Self {
        self.max_date_regression_days = days;
        self
    }

    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = Some(days);
        self
    }

    pub fn with_example_cap(mut self, cap: usize) -> Self {
        self.example_cap = cap;
        self
    }
}

/// Which check produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityCheck {
    RecordLoss,
    DateMonotonicity,
    Shape,
    Ordering,
}

impl IntegrityCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrityCheck::RecordLoss => "record loss",
            IntegrityCheck::DateMonotonicity => "date monotonicity",
            IntegrityCheck::Shape => "shape",
            IntegrityCheck::Ordering => "ordering",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub check: IntegrityCheck,
    pub message: String,
}

impl Violation {
    pub fn new(check: IntegrityCheck, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.check.as_str(), self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub violations: Vec<Violation>,
    /// Informational findings (new records, skipped comparisons)
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ValidationResult {
    pub fn from_parts(violations: Vec<Violation>, notes: Vec<String>) -> Self {
        Self {
            ok: violations.is_empty(),
            violations,
            notes,
        }
    }

    pub fn has(&self, check: IntegrityCheck) -> bool {
        self.violations.iter().any(|v| v.check == check)
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }

    /// Fold in violations found elsewhere (e.g. a document shape check).
    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
        self.ok = self.violations.is_empty();
    }
}

/// Compare the current run with the previous one.
///
/// Every check runs; all violations are reported together. With no previous
/// snapshot only the shape of `current` is checked. When the two snapshots
/// were produced under different posting-date filters the cross-run checks
/// are skipped, since the previous run is no longer a valid baseline.
pub fn validate(
    previous: Option<&MetricsSnapshot>,
    current: &MetricsSnapshot,
    previous_ids: &HashSet<String>,
    current_ids: &HashSet<String>,
    policy: &IntegrityPolicy,
) -> ValidationResult {
    let mut violations = Vec::new();
    let mut notes = Vec::new();

    let filter_changed = previous
        .map(|p| !p.data_filter.is_empty() && p.data_filter != current.data_filter)
        .unwrap_or(false);

    if filter_changed {
        notes.push(format!(
            "data filter changed ({:?} -> {:?}); cross-run checks skipped",
            previous.map(|p| p.data_filter.as_str()).unwrap_or_default(),
            current.data_filter
        ));
    } else {
        let new_records = current_ids.difference(previous_ids).count();
        if !previous_ids.is_empty() {
            notes.push(format!("{} new records since previous run", new_records));
        }

        violations.extend(check_record_loss(previous_ids, current_ids, policy));
        if let Some(previous) = previous {
            violations.extend(check_date_progression(previous, current, policy));
        }
    }

    if let Some(previous) = previous {
        violations.extend(check_ordering(previous, current));
    }
    violations.extend(check_ranges(current, policy));

    ValidationResult::from_parts(violations, notes)
}

fn check_record_loss(
    previous_ids: &HashSet<String>,
    current_ids: &HashSet<String>,
    policy: &IntegrityPolicy,
) -> Option<Violation> {
    if previous_ids.is_empty() {
        return None;
    }

    let mut lost: Vec<&String> = previous_ids.difference(current_ids).collect();
    let fraction = lost.len() as f64 / previous_ids.len() as f64;
    if fraction <= policy.max_shrinkage {
        return None;
    }

    lost.sort();
    let sample: Vec<&str> = lost.iter().take(10).map(|id| id.as_str()).collect();
    Some(Violation::new(
        IntegrityCheck::RecordLoss,
        format!(
            "{} of {} previously seen records missing ({:.1}% exceeds {:.1}% tolerance); first missing: {}",
            lost.len(),
            previous_ids.len(),
            fraction * 100.0,
            policy.max_shrinkage * 100.0,
            sample.join(", ")
        ),
    ))
}

fn check_date_progression(
    previous: &MetricsSnapshot,
    current: &MetricsSnapshot,
    policy: &IntegrityPolicy,
) -> Option<Violation> {
    let previous_date = previous.last_it_specialist_posting_date()?;
    let floor = previous_date - Duration::days(policy.max_date_regression_days);

    let current_date = current.last_it_specialist_posting_date();
    if matches!(current_date, Some(date) if date >= floor) {
        return None;
    }

    // Postings re-titled to compliant names take the old IT Specialist
    // announcement with them. Only a compliant posting dated after the
    // regressed date, and newer than any compliant posting already seen,
    // explains the drop.
    let explained = current.latest_compliant_posting.is_some_and(|compliant| {
        let after_regression = match current_date {
            Some(date) => compliant > date,
            None => compliant >= floor,
        };
        let newer_than_before = previous
            .latest_compliant_posting
            .map_or(true, |before| compliant > before);
        after_regression && newer_than_before
    });
    if explained {
        return None;
    }

    let current_label = current_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "none".to_string());
    Some(Violation::new(
        IntegrityCheck::DateMonotonicity,
        format!(
            "most recent IT Specialist posting went backwards: {} -> {} with no new compliant posting",
            previous_date, current_label
        ),
    ))
}

fn check_ordering(previous: &MetricsSnapshot, current: &MetricsSnapshot) -> Option<Violation> {
    if previous.generated_at <= current.generated_at {
        return None;
    }
    Some(Violation::new(
        IntegrityCheck::Ordering,
        format!(
            "previous snapshot ({}) is newer than current ({})",
            previous.generated_at.to_rfc3339(),
            current.generated_at.to_rfc3339()
        ),
    ))
}

fn check_ranges(current: &MetricsSnapshot, policy: &IntegrityPolicy) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut shape = |message: String| violations.push(Violation::new(IntegrityCheck::Shape, message));

    if !current.percentage.is_finite() || !(0.0..=100.0).contains(&current.percentage) {
        shape(format!("percentage {} outside [0, 100]", current.percentage));
    } else if (percentage(current.it_specialist_count, current.total_jobs) - current.percentage).abs()
        > 0.05
    {
        shape(format!(
            "percentage {} does not match {}/{}",
            current.percentage, current.it_specialist_count, current.total_jobs
        ));
    }

    if current.it_specialist_count + current.compliant_count > current.total_jobs {
        shape(format!(
            "classified counts ({} IT Specialist + {} compliant) exceed total {}",
            current.it_specialist_count, current.compliant_count, current.total_jobs
        ));
    }

    if let Some(days) = current.days_since_last_it_specialist.filter(|d| *d < 0) {
        shape(format!("days since last IT Specialist posting is negative ({})", days));
    }

    if current.example_non_compliant_titles.len() > policy.example_cap {
        shape(format!(
            "{} example titles exceed cap of {}",
            current.example_non_compliant_titles.len(),
            policy.example_cap
        ));
    }

    violations
}
