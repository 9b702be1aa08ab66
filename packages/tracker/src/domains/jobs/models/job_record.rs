use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use usajobs_client::SearchResultItem;

/// One job announcement, reduced to the fields the tracker reasons about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Stable across fetches, unique within a snapshot
    pub id: String,
    pub title: String,
    pub series: String,
    pub posted_date: NaiveDate,
    pub agency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Why an announcement could not become a [`JobRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("announcement has no identifier")]
    MissingId,

    #[error("announcement {id} has no title")]
    MissingTitle { id: String },

    #[error("announcement {id} has no parsable posting date")]
    MissingDate { id: String },
}

impl JobRecord {
    /// Convert an API item. The identifier is taken from `PositionID`, then the
    /// trailing segment of a `/job/` URI, then `MatchedObjectId`.
    pub fn from_search_item(
        item: &SearchResultItem,
        default_series: &str,
    ) -> Result<Self, RecordError> {
        let d = &item.descriptor;

        let id = non_blank(d.position_id.as_deref())
            .or_else(|| d.position_uri.as_deref().and_then(id_from_uri))
            .or_else(|| non_blank(item.matched_object_id.as_deref()))
            .ok_or(RecordError::MissingId)?
            .to_string();

        let title = match non_blank(d.position_title.as_deref()) {
            Some(title) => title.trim().to_string(),
            None => return Err(RecordError::MissingTitle { id }),
        };

        let posted_date = match d.posted_date() {
            Some(date) => date,
            None => return Err(RecordError::MissingDate { id }),
        };

        let agency = non_blank(d.organization_name.as_deref())
            .or_else(|| non_blank(d.department_name.as_deref()))
            .unwrap_or("Unknown")
            .to_string();

        Ok(Self {
            id,
            title,
            series: d.series_code().unwrap_or(default_series).to_string(),
            posted_date,
            agency,
            link: d.public_link(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn id_from_uri(uri: &str) -> Option<&str> {
    if !uri.contains("/job/") {
        return None;
    }
    uri.trim_end_matches('/').rsplit('/').next().filter(|s| !s.is_empty())
}

/// Tally of announcements dropped while building a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipSummary {
    pub missing_id: usize,
    pub missing_title: usize,
    pub missing_date: usize,
    /// Same identifier seen more than once in one fetch
    pub duplicates: usize,
    /// Well-formed, but posted before the tracking window
    pub before_cutoff: usize,
}

impl SkipSummary {
    pub fn record(&mut self, error: &RecordError) {
        match error {
            RecordError::MissingId => self.missing_id += 1,
            RecordError::MissingTitle { .. } => self.missing_title += 1,
            RecordError::MissingDate { .. } => self.missing_date += 1,
        }
    }

    /// Malformed announcements only (duplicates and out-of-window ones are expected).
    pub fn malformed(&self) -> usize {
        self.missing_id + self.missing_title + self.missing_date
    }
}

/// Turn raw API items into records for the tracking window.
///
/// Malformed items are skipped and counted; the first occurrence of a
/// duplicated identifier wins.
pub fn collect_records(
    items: &[SearchResultItem],
    default_series: &str,
    posted_since: NaiveDate,
) -> (Vec<JobRecord>, SkipSummary) {
    let mut records = Vec::with_capacity(items.len());
    let mut summary = SkipSummary::default();
    let mut seen = HashSet::new();

    for item in items {
        let record = match JobRecord::from_search_item(item, default_series) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed announcement");
                summary.record(&e);
                continue;
            }
        };

        if record.posted_date < posted_since {
            summary.before_cutoff += 1;
            continue;
        }

        if !seen.insert(record.id.clone()) {
            summary.duplicates += 1;
            continue;
        }

        records.push(record);
    }

    (records, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use usajobs_client::PositionDescriptor;

    fn item(id: Option<&str>, title: Option<&str>, date: Option<&str>) -> SearchResultItem {
        SearchResultItem {
            matched_object_id: None,
            descriptor: PositionDescriptor {
                position_id: id.map(String::from),
                position_title: title.map(String::from),
                position_start_date: date.map(String::from),
                organization_name: Some("Bureau of the Fiscal Service".into()),
                ..Default::default()
            },
        }
    }

    fn cutoff() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    #[test]
    fn test_from_search_item() {
        let record = JobRecord::from_search_item(
            &item(Some("FS-1"), Some("  IT Specialist (APPSW) "), Some("2025-10-07T00:00:00")),
            "2210",
        )
        .unwrap();
        assert_eq!(record.id, "FS-1");
        assert_eq!(record.title, "IT Specialist (APPSW)");
        assert_eq!(record.series, "2210");
        assert_eq!(record.agency, "Bureau of the Fiscal Service");
        assert_eq!(record.posted_date, NaiveDate::from_ymd_opt(2025, 10, 7).unwrap());
    }

    #[test]
    fn test_id_falls_back_to_uri() {
        let mut raw = item(None, Some("IT Specialist"), Some("2025-10-07"));
        raw.descriptor.position_uri = Some("https://www.usajobs.gov:443/job/845001200".into());
        let record = JobRecord::from_search_item(&raw, "2210").unwrap();
        assert_eq!(record.id, "845001200");
        assert_eq!(record.link.as_deref(), Some("https://www.usajobs.gov/job/845001200"));
    }

    #[test]
    fn test_malformed_items_are_reported() {
        assert_eq!(
            JobRecord::from_search_item(&item(None, Some("x"), Some("2025-10-07")), "2210"),
            Err(RecordError::MissingId)
        );
        assert_eq!(
            JobRecord::from_search_item(&item(Some("A"), Some(" "), Some("2025-10-07")), "2210"),
            Err(RecordError::MissingTitle { id: "A".into() })
        );
        assert_eq!(
            JobRecord::from_search_item(&item(Some("A"), Some("x"), Some("soon")), "2210"),
            Err(RecordError::MissingDate { id: "A".into() })
        );
    }

    #[test]
    fn test_collect_records_skips_and_counts() {
        let items = vec![
            item(Some("A"), Some("IT Specialist"), Some("2025-10-02")),
            item(Some("A"), Some("IT Specialist"), Some("2025-10-02")),
            item(Some("B"), None, Some("2025-10-02")),
            item(Some("C"), Some("Data Scientist"), Some("2025-09-30")),
            item(Some("D"), Some("IT Program Manager"), Some("2025-10-01")),
        ];

        let (records, summary) = collect_records(&items, "2210", cutoff());

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "D"]);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.missing_title, 1);
        assert_eq!(summary.before_cutoff, 1);
        assert_eq!(summary.malformed(), 1);
    }
}
