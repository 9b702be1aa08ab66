use anyhow::{bail, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use crate::common::read_json;
use crate::domains::integrity::{check_metrics_document, validate, IntegrityPolicy, ValidationResult};
use crate::domains::jobs::models::JobsSnapshot;
use crate::kernel::SnapshotStore;

/// Validate `current` against the snapshot that preceded it.
///
/// Records older than the policy's retention horizon are allowed to
/// disappear and are left out of the loss comparison.
pub fn validate_snapshots(
    previous: Option<&JobsSnapshot>,
    current: &JobsSnapshot,
    policy: &IntegrityPolicy,
) -> ValidationResult {
    let previous_ids = previous
        .map(|p| p.ids_within_retention(current.generated_at.date_naive(), policy.retention_days))
        .unwrap_or_default();

    validate(
        previous.map(|p| &p.metrics),
        &current.metrics,
        &previous_ids,
        &current.record_ids(),
        policy,
    )
}

/// Re-run validation of the newest persisted snapshot against the newest
/// earlier one that passed, plus the shape of the published metrics document
/// when it exists.
pub fn validate_history(
    store: &SnapshotStore,
    policy: &IntegrityPolicy,
    metrics_path: &Path,
) -> Result<ValidationResult> {
    let Some(current) = store.most_recent()? else {
        bail!("No snapshots found in {}", store.dir().display());
    };
    let previous = store.baseline(Some(current.generated_at))?;

    if previous.is_none() {
        info!("No earlier passing snapshot in history; checking the newest on its own");
    }

    let mut result = validate_snapshots(previous.as_ref(), &current, policy);

    if metrics_path.exists() {
        let document: Value = read_json(metrics_path)?;
        result.extend(check_metrics_document(&document));
    } else {
        warn!(path = %metrics_path.display(), "Published metrics file not found; skipping shape check");
    }

    Ok(result)
}
