//! Metrics aggregation over classified job records.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

use super::classifier::{classify, TitleLabel};
use super::models::{JobRecord, MetricsSnapshot, MostRecentPosting};
use crate::common::normalize_title;

/// Inputs to [`aggregate`] besides the records themselves.
#[derive(Debug, Clone)]
pub struct AggregateContext {
    /// Reference time for `generated_at` and day counts
    pub now: DateTime<Utc>,

    /// Maximum number of example titles kept. Default: 10.
    pub example_cap: usize,

    /// Last IT Specialist posting from earlier runs.
    ///
    /// Used when the current records contain none, so the day counter keeps
    /// running instead of resetting to null.
    pub last_known_it_specialist: Option<MostRecentPosting>,

    /// Description of the posting-date window, copied into the snapshot
    pub data_filter: String,
}

impl AggregateContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            example_cap: 10,
            last_known_it_specialist: None,
            data_filter: String::new(),
        }
    }

    pub fn with_example_cap(mut self, cap: usize) -> Self {
        self.example_cap = cap;
        self
    }

    pub fn with_history(mut self, last_known: Option<MostRecentPosting>) -> Self {
        self.last_known_it_specialist = last_known.filter(|p| p.date_posted.is_some());
        self
    }

    pub fn with_data_filter(mut self, filter: impl Into<String>) -> Self {
        self.data_filter = filter.into();
        self
    }
}

/// Compute summary metrics for one run.
///
/// `labels` runs parallel to `records`; a record without a label is
/// classified on the spot. Pure: the only clock is `ctx.now`.
pub fn aggregate(
    records: &[JobRecord],
    labels: &[TitleLabel],
    ctx: &AggregateContext,
) -> MetricsSnapshot {
    let mut it_specialist_count = 0u64;
    let mut compliant_count = 0u64;
    let mut latest_it_specialist: Option<&JobRecord> = None;
    let mut latest_compliant: Option<NaiveDate> = None;
    let mut examples = Vec::new();
    let mut seen_examples = HashSet::new();

    for (i, record) in records.iter().enumerate() {
        let label = labels
            .get(i)
            .copied()
            .unwrap_or_else(|| classify(&record.title));

        match label {
            TitleLabel::ItSpecialist => {
                it_specialist_count += 1;
                // Ties keep the first record seen
                if latest_it_specialist.map_or(true, |r| record.posted_date > r.posted_date) {
                    latest_it_specialist = Some(record);
                }
            }
            TitleLabel::Compliant => {
                compliant_count += 1;
                if latest_compliant.map_or(true, |d| record.posted_date > d) {
                    latest_compliant = Some(record.posted_date);
                }
            }
            TitleLabel::OtherGenericTitle => {
                if examples.len() < ctx.example_cap
                    && seen_examples.insert(normalize_title(&record.title))
                {
                    examples.push(record.title.clone());
                }
            }
            TitleLabel::Other => {}
        }
    }

    let total_jobs = records.len() as u64;

    let most_recent = match latest_it_specialist {
        Some(record) => MostRecentPosting {
            title: Some(record.title.clone()),
            date_posted: Some(record.posted_date),
            link: record.link.clone(),
        },
        None => ctx.last_known_it_specialist.clone().unwrap_or_default(),
    };

    let today = ctx.now.date_naive();
    let days_since_last_it_specialist = most_recent
        .date_posted
        .map(|date| (today - date).num_days().max(0));

    MetricsSnapshot {
        generated_at: ctx.now,
        total_jobs,
        it_specialist_count,
        percentage: percentage(it_specialist_count, total_jobs),
        days_since_last_it_specialist,
        example_non_compliant_titles: examples,
        compliant_count,
        most_recent_it_specialist: most_recent,
        latest_compliant_posting: latest_compliant,
        data_filter: ctx.data_filter.clone(),
    }
}

/// `part / total * 100` rounded to one decimal, 0 for an empty total.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    ((raw * 10.0).round() / 10.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::jobs::classifier::classify_all;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 15, 6, 0, 0).unwrap()
    }

    fn record(id: &str, title: &str, day: u32) -> JobRecord {
        JobRecord {
            id: id.into(),
            title: title.into(),
            series: "2210".into(),
            posted_date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            agency: "Department of the Interior".into(),
            link: Some(format!("https://www.usajobs.gov/job/{}", id)),
        }
    }

    fn run(records: &[JobRecord], ctx: &AggregateContext) -> MetricsSnapshot {
        let labels = classify_all(records.iter().map(|r| r.title.as_str()));
        aggregate(records, &labels, ctx)
    }

    #[test]
    fn test_empty_input() {
        let metrics = aggregate(&[], &[], &AggregateContext::new(now()));
        assert_eq!(metrics.total_jobs, 0);
        assert_eq!(metrics.percentage, 0.0);
        assert_eq!(metrics.days_since_last_it_specialist, None);
        assert!(metrics.example_non_compliant_titles.is_empty());
    }

    #[test]
    fn test_counts_and_percentage() {
        let records = vec![
            record("1", "IT Specialist (INFOSEC)", 3),
            record("2", "Information Technology Specialist, Cybersecurity", 4),
            record("3", "IT PROGRAM MANAGER", 5),
        ];
        let metrics = run(&records, &AggregateContext::new(now()));

        assert_eq!(metrics.total_jobs, 3);
        assert_eq!(metrics.it_specialist_count, 1);
        assert_eq!(metrics.compliant_count, 1);
        assert_eq!(metrics.percentage, 33.3);
        assert_eq!(metrics.latest_compliant_posting, NaiveDate::from_ymd_opt(2025, 10, 4));
    }

    #[test]
    fn test_days_since_latest_it_specialist() {
        let records = vec![
            record("1", "IT Specialist", 3),
            record("2", "ITSPEC (NETWORK)", 9),
            record("3", "IT Specialist (SYSADMIN)", 6),
        ];
        let metrics = run(&records, &AggregateContext::new(now()));

        assert_eq!(metrics.days_since_last_it_specialist, Some(6));
        assert_eq!(
            metrics.most_recent_it_specialist.title.as_deref(),
            Some("ITSPEC (NETWORK)")
        );
        assert_eq!(
            metrics.most_recent_it_specialist.link.as_deref(),
            Some("https://www.usajobs.gov/job/2")
        );
    }

    #[test]
    fn test_future_posting_clamps_to_zero_days() {
        let records = vec![record("1", "IT Specialist", 20)];
        let metrics = run(&records, &AggregateContext::new(now()));
        assert_eq!(metrics.days_since_last_it_specialist, Some(0));
    }

    #[test]
    fn test_history_carries_day_counter() {
        let history = MostRecentPosting {
            title: Some("IT Specialist".into()),
            date_posted: NaiveDate::from_ymd_opt(2025, 10, 1),
            link: None,
        };
        let ctx = AggregateContext::new(now()).with_history(Some(history));
        let metrics = run(&[record("1", "Data Scientist", 10)], &ctx);

        assert_eq!(metrics.it_specialist_count, 0);
        assert_eq!(metrics.days_since_last_it_specialist, Some(14));
    }

    #[test]
    fn test_examples_distinct_first_seen_and_capped() {
        let records = vec![
            record("1", "IT Project Manager", 2),
            record("2", "IT   PROJECT MANAGER", 2),
            record("3", "IT System Administrator", 2),
            record("4", "IT Specialist", 2),
            record("5", "Information Technology Manager", 2),
        ];
        let ctx = AggregateContext::new(now()).with_example_cap(2);
        let metrics = run(&records, &ctx);

        assert_eq!(
            metrics.example_non_compliant_titles,
            vec!["IT Project Manager", "IT System Administrator"]
        );
    }

    #[test]
    fn test_missing_labels_are_classified() {
        let records = vec![record("1", "IT Specialist", 3), record("2", "IT Specialist", 4)];
        let metrics = aggregate(&records, &[TitleLabel::ItSpecialist], &AggregateContext::new(now()));
        assert_eq!(metrics.it_specialist_count, 2);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let records = vec![record("1", "IT Specialist", 3), record("2", "Accountant", 4)];
        let first = run(&records, &AggregateContext::new(now()));
        let later = Utc.with_ymd_and_hms(2025, 10, 15, 7, 0, 0).unwrap();
        let second = run(&records, &AggregateContext::new(later));
        assert!(first.same_figures(&second));
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(5, 5), 100.0);
    }
}
