//! Public GitHub activity of federal agencies.

pub mod activities;
pub mod agencies;
pub mod matrix;
pub mod models;

pub use activities::{fetch_org_activity, run_activity, ActivityRunOutcome};
pub use agencies::{Agency, FEDERAL_AGENCIES};
pub use matrix::{activity_window, ActivityMatrix};
pub use models::{ActivityLevel, ActivityRecord, ActivitySummary, AgencySummary, OrgActivity};
