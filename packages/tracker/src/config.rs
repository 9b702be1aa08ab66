use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domains::integrity::IntegrityPolicy;

/// Occupational series tracked by the jobs run (Information Technology Management).
pub const DEFAULT_SERIES: &str = "2210";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub usajobs_api_token: Option<String>,
    pub usajobs_user_agent: Option<String>,
    pub github_token: Option<String>,
    pub output_dir: PathBuf,
    pub history_dir: PathBuf,
    pub series: String,
    pub posted_since: NaiveDate,
    pub example_title_cap: usize,
    pub history_keep: usize,
    pub activity_days: i64,
    pub schedule: String,
    pub integrity: IntegrityPolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let posted_since = match non_empty("TRACKER_POSTED_SINCE") {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .context("TRACKER_POSTED_SINCE must be a YYYY-MM-DD date")?,
            None => default_posted_since(),
        };

        let max_shrinkage: f64 = parse_or(&var, "TRACKER_MAX_SHRINKAGE", 0.05)?;
        if !(0.0..=1.0).contains(&max_shrinkage) {
            bail!("TRACKER_MAX_SHRINKAGE must be between 0.0 and 1.0");
        }

        let max_date_regression_days: i64 =
            parse_or(&var, "TRACKER_MAX_DATE_REGRESSION_DAYS", 0)?;
        if max_date_regression_days < 0 {
            bail!("TRACKER_MAX_DATE_REGRESSION_DAYS must not be negative");
        }

        let retention_days = match non_empty("TRACKER_RETENTION_DAYS") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<i64>()
                    .context("TRACKER_RETENTION_DAYS must be a whole number of days")?,
            ),
            None => None,
        };

        let example_title_cap = parse_or(&var, "TRACKER_EXAMPLE_TITLE_CAP", 10)?;

        let history_keep: usize = parse_or(&var, "TRACKER_HISTORY_KEEP", 2)?;
        if history_keep < 2 {
            bail!("TRACKER_HISTORY_KEEP must be at least 2 to compare consecutive runs");
        }

        let mut integrity = IntegrityPolicy::default()
            .with_max_shrinkage(max_shrinkage)
            .with_max_date_regression_days(max_date_regression_days)
            .with_example_cap(example_title_cap);
        if let Some(days) = retention_days {
            integrity = integrity.with_retention_days(days);
        }

        Ok(Self {
            usajobs_api_token: non_empty("USAJOBS_API_TOKEN"),
            usajobs_user_agent: non_empty("USAJOBS_USER_AGENT"),
            github_token: non_empty("GITHUB_TOKEN"),
            output_dir: non_empty("TRACKER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("deploy/data")),
            history_dir: non_empty("TRACKER_HISTORY_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            series: non_empty("TRACKER_SERIES").unwrap_or_else(|| DEFAULT_SERIES.to_string()),
            posted_since,
            example_title_cap,
            history_keep,
            activity_days: parse_or(&var, "TRACKER_ACTIVITY_DAYS", 30)?,
            schedule: non_empty("TRACKER_SCHEDULE").unwrap_or_else(|| "0 0 6 * * *".to_string()),
            integrity,
        })
    }

    /// The jobs run cannot start without a USAJobs key.
    pub fn require_usajobs_token(&self) -> Result<&str> {
        self.usajobs_api_token
            .as_deref()
            .context("USAJOBS_API_TOKEN must be set")
    }

    /// Human-readable description of the posting-date filter, stored in every
    /// snapshot so a changed filter can be detected between runs.
    pub fn data_filter(&self) -> String {
        format!(
            "Jobs posted since {}",
            self.posted_since.format("%B %-d, %Y")
        )
    }
}

fn default_posted_since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap_or_default()
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.series, "2210");
        assert_eq!(config.posted_since, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert_eq!(config.example_title_cap, 10);
        assert_eq!(config.history_keep, 2);
        assert_eq!(config.output_dir, PathBuf::from("deploy/data"));
        assert_eq!(config.integrity.max_shrinkage, 0.05);
        assert!(config.integrity.retention_days.is_none());
        assert!(config.require_usajobs_token().is_err());
    }

    #[test]
    fn test_data_filter_label() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_filter(), "Jobs posted since October 1, 2025");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("USAJOBS_API_TOKEN", "secret"),
            ("TRACKER_MAX_SHRINKAGE", "0.1"),
            ("TRACKER_RETENTION_DAYS", "45"),
            ("TRACKER_POSTED_SINCE", "2025-11-01"),
            ("TRACKER_HISTORY_DIR", "/tmp/history"),
        ])
        .unwrap();
        assert_eq!(config.require_usajobs_token().unwrap(), "secret");
        assert_eq!(config.integrity.max_shrinkage, 0.1);
        assert_eq!(config.integrity.retention_days, Some(45));
        assert_eq!(config.posted_since, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(config.history_dir, PathBuf::from("/tmp/history"));
    }

    #[test]
    fn test_rejects_out_of_range_tolerance() {
        assert!(config_from(&[("TRACKER_MAX_SHRINKAGE", "1.5")]).is_err());
        assert!(config_from(&[("TRACKER_MAX_SHRINKAGE", "lots")]).is_err());
        assert!(config_from(&[("TRACKER_HISTORY_KEEP", "1")]).is_err());
    }

    #[test]
    fn test_blank_token_is_unset() {
        let config = config_from(&[("GITHUB_TOKEN", "  ")]).unwrap();
        assert!(config.github_token.is_none());
    }
}
