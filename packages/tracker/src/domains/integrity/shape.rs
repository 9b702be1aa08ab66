//! Structural checks on published JSON documents.
//!
//! The dashboard reads these files directly, so a missing key or a wrongly
//! typed value breaks it just as badly as a wrong number.

use serde_json::Value;

use super::validator::{IntegrityCheck, Violation};

const METRICS_FIELDS: &[&str] = &[
    "generated_at",
    "total_2210_jobs",
    "it_specialist_jobs",
    "it_specialist_percentage",
    "days_since_last_it_specialist",
    "most_recent_it_specialist",
    "other_bad_titles",
];

const POSTING_FIELDS: &[&str] = &["title", "date_posted", "link"];

const ACTIVITY_FIELDS: &[&str] = &[
    "generated_at",
    "days",
    "total_agencies",
    "active_agencies",
    "total_commits",
    "total_prs",
    "agencies",
    "records",
    "matrix",
];

/// Check a `2210_metrics.json` document.
pub fn check_metrics_document(doc: &Value) -> Vec<Violation> {
    let mut problems = Vec::new();

    let Some(obj) = doc.as_object() else {
        return vec![shape("metrics document is not a JSON object")];
    };

    for key in METRICS_FIELDS {
        if !obj.contains_key(*key) {
            problems.push(shape(format!("metrics document is missing `{}`", key)));
        }
    }

    for key in ["total_2210_jobs", "it_specialist_jobs"] {
        if let Some(value) = obj.get(key) {
            if value.as_u64().is_none() {
                problems.push(shape(format!("`{}` must be a non-negative integer", key)));
            }
        }
    }

    if let Some(value) = obj.get("it_specialist_percentage") {
        match value.as_f64() {
            Some(p) if (0.0..=100.0).contains(&p) => {}
            _ => problems.push(shape("`it_specialist_percentage` must be a number in [0, 100]")),
        }
    }

    if let Some(value) = obj.get("days_since_last_it_specialist") {
        if !value.is_null() && value.as_u64().is_none() {
            problems.push(shape(
                "`days_since_last_it_specialist` must be null or a non-negative integer",
            ));
        }
    }

    if let Some(value) = obj.get("other_bad_titles") {
        let all_strings = value
            .as_array()
            .map(|items| items.iter().all(Value::is_string))
            .unwrap_or(false);
        if !all_strings {
            problems.push(shape("`other_bad_titles` must be a list of strings"));
        }
    }

    if let Some(posting) = obj.get("most_recent_it_specialist") {
        match posting.as_object() {
            Some(posting) => {
                for key in POSTING_FIELDS {
                    if !posting.contains_key(*key) {
                        problems.push(shape(format!(
                            "`most_recent_it_specialist` is missing `{}`",
                            key
                        )));
                    }
                }
            }
            None => problems.push(shape("`most_recent_it_specialist` must be an object")),
        }
    }

    problems
}

/// Check a `github_activity.json` document.
pub fn check_activity_document(doc: &Value) -> Vec<Violation> {
    let mut problems = Vec::new();

    let Some(obj) = doc.as_object() else {
        return vec![shape("activity document is not a JSON object")];
    };

    for key in ACTIVITY_FIELDS {
        if !obj.contains_key(*key) {
            problems.push(shape(format!("activity document is missing `{}`", key)));
        }
    }

    let total = obj.get("total_agencies").and_then(Value::as_u64);
    let active = obj.get("active_agencies").and_then(Value::as_u64);
    if let (Some(total), Some(active)) = (total, active) {
        if active > total {
            problems.push(shape(format!(
                "active agencies ({}) exceed total agencies ({})",
                active, total
            )));
        }
    }

    if let Some(agencies) = obj.get("agencies") {
        match agencies.as_object() {
            Some(entries) => {
                if let Some(total) = total {
                    if entries.len() as u64 != total {
                        problems.push(shape(format!(
                            "{} agency entries but total_agencies is {}",
                            entries.len(),
                            total
                        )));
                    }
                }
            }
            None => problems.push(shape("`agencies` must be an object keyed by agency name")),
        }
    }

    problems
}

fn shape(message: impl Into<String>) -> Violation {
    Violation::new(IntegrityCheck::Shape, message)
}
