//! Heatmap matrix: one row per agency, one column per day.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::ActivityRecord;

/// The `days` calendar days ending at `today`, oldest first.
pub fn activity_window(today: NaiveDate, days: i64) -> Vec<NaiveDate> {
    (0..days.max(0))
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

/// Commits + pull requests per agency per day.
///
/// `values[row][col]` belongs to `agencies[row]` on `dates[col]`. Every cell
/// exists; days without activity are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMatrix {
    pub dates: Vec<NaiveDate>,
    pub agencies: Vec<String>,
    pub values: Vec<Vec<u64>>,
}

impl ActivityMatrix {
    /// Records for agencies or dates outside the axes are dropped; repeated
    /// (agency, date) pairs are summed.
    pub fn build(records: &[ActivityRecord], dates: &[NaiveDate], agencies: &[&str]) -> Self {
        let columns: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        let rows: HashMap<&str, usize> =
            agencies.iter().enumerate().map(|(i, a)| (*a, i)).collect();

        let mut values = vec![vec![0u64; dates.len()]; agencies.len()];
        for record in records {
            let (Some(&row), Some(&col)) =
                (rows.get(record.agency.as_str()), columns.get(&record.date))
            else {
                continue;
            };
            values[row][col] += record.total();
        }

        Self {
            dates: dates.to_vec(),
            agencies: agencies.iter().map(|a| a.to_string()).collect(),
            values,
        }
    }

    pub fn get(&self, agency: &str, date: NaiveDate) -> Option<u64> {
        let row = self.agencies.iter().position(|a| a == agency)?;
        let col = self.dates.iter().position(|d| *d == date)?;
        Some(self.values[row][col])
    }

    /// Largest cell, for colour scaling.
    pub fn max_value(&self) -> u64 {
        self.values.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn row_total(&self, agency: &str) -> Option<u64> {
        let row = self.agencies.iter().position(|a| a == agency)?;
        Some(self.values[row].iter().sum())
    }
}
