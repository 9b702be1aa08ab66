use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{info, warn};

use super::validate_history::validate_snapshots;
use crate::common::write_json_atomic;
use crate::config::Config;
use crate::domains::integrity::{check_metrics_document, ValidationResult};
use crate::domains::jobs::classifier::classify_all;
use crate::domains::jobs::metrics::{aggregate, AggregateContext};
use crate::domains::jobs::models::{collect_records, JobsSnapshot};
use crate::kernel::{BaseJobSearch, SnapshotStore};

#[derive(Debug)]
pub struct JobsRunOutcome {
    pub snapshot: JobsSnapshot,
    pub snapshot_path: PathBuf,
    pub metrics_path: PathBuf,
    pub validation: ValidationResult,
}

/// Path of the published metrics document for a series.
pub fn metrics_path(config: &Config) -> PathBuf {
    config.output_dir.join(format!("{}_metrics.json", config.series))
}

/// One jobs run: fetch, classify, aggregate, persist, validate.
///
/// A fetch failure aborts before anything is written. Integrity violations
/// do not abort; the snapshot and metrics are written and the returned
/// validation result carries the violations.
pub async fn run_jobs(
    search: &dyn BaseJobSearch,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<JobsRunOutcome> {
    info!(series = %config.series, since = %config.posted_since, "Fetching job announcements");

    let items = search
        .search_series(&config.series)
        .await
        .context("Failed to fetch job announcements")?;

    let (records, skipped) = collect_records(&items, &config.series, config.posted_since);
    if skipped.malformed() > 0 {
        warn!(
            missing_id = skipped.missing_id,
            missing_title = skipped.missing_title,
            missing_date = skipped.missing_date,
            "Skipped malformed announcements"
        );
    }
    info!(
        fetched = items.len(),
        kept = records.len(),
        before_cutoff = skipped.before_cutoff,
        duplicates = skipped.duplicates,
        "Collected job records"
    );

    let labels = classify_all(records.iter().map(|r| r.title.as_str()));

    let store = SnapshotStore::new(&config.history_dir, &config.series);
    // Runs that failed validation never become the comparison baseline
    let previous = store.baseline(None)?;
    if previous.is_none() {
        info!("No passing snapshot in history; this run starts a new baseline");
    }

    let data_filter = config.data_filter();
    // A changed filter starts a new baseline; don't carry its history forward
    let history = previous
        .as_ref()
        .filter(|p| p.data_filter == data_filter)
        .map(|p| p.metrics.most_recent_it_specialist.clone());

    let ctx = AggregateContext::new(now)
        .with_example_cap(config.example_title_cap)
        .with_history(history)
        .with_data_filter(data_filter.clone());
    let metrics = aggregate(&records, &labels, &ctx);

    info!(
        total = metrics.total_jobs,
        it_specialist = metrics.it_specialist_count,
        percentage = metrics.percentage,
        days_since = ?metrics.days_since_last_it_specialist,
        "Aggregated metrics"
    );

    let mut snapshot = JobsSnapshot {
        generated_at: now,
        data_filter,
        series: config.series.clone(),
        records,
        metrics,
        skipped,
        passed_validation: false,
    };

    let mut validation = validate_snapshots(previous.as_ref(), &snapshot, &config.integrity);
    let document =
        serde_json::to_value(&snapshot.metrics).context("Failed to serialize metrics")?;
    validation.extend(check_metrics_document(&document));
    snapshot.passed_validation = validation.ok;

    let snapshot_path = store.save(&snapshot)?;
    let metrics_path = metrics_path(config);
    write_json_atomic(&metrics_path, &snapshot.metrics)?;

    for note in &validation.notes {
        info!("{}", note);
    }
    for violation in &validation.violations {
        warn!(check = violation.check.as_str(), "{}", violation.message);
    }

    let pruned = store.prune(config.history_keep)?;
    if pruned > 0 {
        info!(pruned, "Pruned old snapshots");
    }

    Ok(JobsRunOutcome {
        snapshot,
        snapshot_path,
        metrics_path,
        validation,
    })
}
