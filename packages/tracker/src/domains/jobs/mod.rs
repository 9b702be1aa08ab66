//! Occupational series 2210 job announcements and title compliance.

pub mod activities;
pub mod classifier;
pub mod metrics;
pub mod models;

pub use activities::{run_jobs, validate_history, validate_snapshots, JobsRunOutcome};
pub use classifier::{classify, classify_all, classify_with_rule, is_it_specialist, TitleLabel};
pub use metrics::{aggregate, percentage, AggregateContext};
pub use models::{JobRecord, JobsSnapshot, MetricsSnapshot, MostRecentPosting};
