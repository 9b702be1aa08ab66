//! On-disk history of jobs snapshots.
//!
//! One pretty-printed JSON file per run, named
//! `<series>_jobs_<YYYYMMDD_HHMMSS>.json` so lexical order is chronological.
//! Only the newest few are kept, plus the newest snapshot that passed
//! validation, which is the baseline the next run is compared against.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{read_json, write_json_atomic};
use crate::domains::jobs::models::JobsSnapshot;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub struct SnapshotStore {
    dir: PathBuf,
    prefix: String,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, series: &str) -> Self {
        Self {
            dir: dir.into(),
            prefix: format!("{}_jobs_", series),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, generated_at: DateTime<Utc>) -> PathBuf {
        self.dir.join(format!(
            "{}{}.json",
            self.prefix,
            generated_at.format(TIMESTAMP_FORMAT)
        ))
    }

    pub fn save(&self, snapshot: &JobsSnapshot) -> Result<PathBuf> {
        let path = self.path_for(snapshot.generated_at);
        write_json_atomic(&path, snapshot)?;
        tracing::info!(path = %path.display(), records = snapshot.records.len(), "Saved jobs snapshot");
        Ok(path)
    }

    /// Snapshot files, oldest first. A missing directory is an empty history.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list {}", self.dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_snapshot = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&self.prefix) && n.ends_with(".json"))
                .unwrap_or(false);
            if is_snapshot {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }

    /// The newest `n` readable snapshots, oldest first.
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn latest(&self, n: usize) -> Result<Vec<JobsSnapshot>> {
        let mut snapshots = Vec::with_capacity(n);
        for path in self.list()?.iter().rev() {
            if snapshots.len() == n {
                break;
            }
            match read_json::<JobsSnapshot>(path) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot"),
            }
        }

        snapshots.reverse();
        snapshots.sort_by_key(|s| s.generated_at);
        Ok(snapshots)
    }

    pub fn most_recent(&self) -> Result<Option<JobsSnapshot>> {
        Ok(self.latest(1)?.pop())
    }

    /// The newest snapshot that passed validation, optionally restricted to
    /// those generated before `before`.
    pub fn baseline(&self, before: Option<DateTime<Utc>>) -> Result<Option<JobsSnapshot>> {
        Ok(self.find_baseline(before)?.map(|(_, snapshot)| snapshot))
    }

    fn find_baseline(
        &self,
        before: Option<DateTime<Utc>>,
    ) -> Result<Option<(PathBuf, JobsSnapshot)>> {
        for path in self.list()?.into_iter().rev() {
            match read_json::<JobsSnapshot>(&path) {
                Ok(snapshot)
                    if snapshot.passed_validation
                        && before.map_or(true, |b| snapshot.generated_at < b) =>
                {
                    return Ok(Some((path, snapshot)));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot"),
            }
        }
        Ok(None)
    }

    /// Delete all but the newest `keep` snapshot files. The current baseline
    /// survives even when it is older. Returns how many were removed.
    pub fn prune(&self, keep: usize) -> Result<usize> {
        let paths = self.list()?;
        let excess = paths.len().saturating_sub(keep);
        let baseline = self.find_baseline(None)?.map(|(path, _)| path);

        let mut removed = 0;
        for path in &paths[..excess] {
            if baseline.as_ref() == Some(path) {
                tracing::debug!(path = %path.display(), "Keeping baseline snapshot");
                continue;
            }
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            tracing::debug!(path = %path.display(), "Pruned old snapshot");
            removed += 1;
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::jobs::models::{MetricsSnapshot, MostRecentPosting, SkipSummary};
    use chrono::TimeZone;

    fn snapshot(hour: u32) -> JobsSnapshot {
        let generated_at = Utc.with_ymd_and_hms(2025, 10, 15, hour, 0, 0).unwrap();
        JobsSnapshot {
            generated_at,
            data_filter: "Jobs posted since October 1, 2025".into(),
            series: "2210".into(),
            records: vec![],
            metrics: MetricsSnapshot {
                generated_at,
                total_jobs: hour as u64,
                it_specialist_count: 0,
                percentage: 0.0,
                days_since_last_it_specialist: None,
                example_non_compliant_titles: vec![],
                compliant_count: 0,
                most_recent_it_specialist: MostRecentPosting::default(),
                latest_compliant_posting: None,
                data_filter: "Jobs posted since October 1, 2025".into(),
            },
            skipped: SkipSummary::default(),
            passed_validation: true,
        }
    }

    fn failed(hour: u32) -> JobsSnapshot {
        JobsSnapshot {
            passed_validation: false,
            ..snapshot(hour)
        }
    }

    #[test]
    fn test_file_naming() {
        let store = SnapshotStore::new("/data", "2210");
        let path = store.path_for(Utc.with_ymd_and_hms(2025, 10, 15, 6, 5, 9).unwrap());
        assert_eq!(path, PathBuf::from("/data/2210_jobs_20251015_060509.json"));
    }

    #[test]
    fn test_missing_dir_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nope"), "2210");
        assert!(store.list().unwrap().is_empty());
        assert!(store.most_recent().unwrap().is_none());
    }

    #[test]
    fn test_latest_and_prune() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), "2210");
        for hour in [3, 1, 2] {
            store.save(&snapshot(hour)).unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let latest = store.latest(2).unwrap();
        let totals: Vec<u64> = latest.iter().map(|s| s.metrics.total_jobs).collect();
        assert_eq!(totals, vec![2, 3]);

        assert_eq!(store.prune(2).unwrap(), 1);
        assert_eq!(store.list().unwrap().len(), 2);
        assert_eq!(store.prune(2).unwrap(), 0);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_unreadable_snapshot_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), "2210");
        store.save(&snapshot(1)).unwrap();
        fs::write(dir.path().join("2210_jobs_20251015_090000.json"), "{ not json").unwrap();

        let recent = store.most_recent().unwrap().unwrap();
        assert_eq!(recent.metrics.total_jobs, 1);
    }

    #[test]
    fn test_baseline_skips_failed_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), "2210");
        store.save(&snapshot(1)).unwrap();
        store.save(&failed(2)).unwrap();
        store.save(&failed(3)).unwrap();

        let baseline = store.baseline(None).unwrap().unwrap();
        assert_eq!(baseline.metrics.total_jobs, 1);
        assert_eq!(store.most_recent().unwrap().unwrap().metrics.total_jobs, 3);

        let cutoff = Utc.with_ymd_and_hms(2025, 10, 15, 1, 0, 0).unwrap();
        assert!(store.baseline(Some(cutoff)).unwrap().is_none());
    }

    #[test]
    fn test_prune_keeps_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), "2210");
        store.save(&snapshot(1)).unwrap();
        for hour in [2, 3, 4] {
            store.save(&failed(hour)).unwrap();
        }

        assert_eq!(store.prune(2).unwrap(), 1);
        let names: Vec<String> = store
            .list()
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(String::from))
            .collect();
        assert_eq!(
            names,
            vec![
                "2210_jobs_20251015_010000.json",
                "2210_jobs_20251015_030000.json",
                "2210_jobs_20251015_040000.json",
            ]
        );
        assert_eq!(store.baseline(None).unwrap().unwrap().metrics.total_jobs, 1);
    }
}
