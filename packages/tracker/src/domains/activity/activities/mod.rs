pub mod fetch_org_activity;
pub mod run_activity;

pub use fetch_org_activity::fetch_org_activity;
pub use run_activity::{run_activity, ActivityRunOutcome, ACTIVITY_FILE};
