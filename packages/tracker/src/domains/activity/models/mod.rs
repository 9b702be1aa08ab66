pub mod org_activity;
pub mod summary;

pub use org_activity::{
    ActivityLevel, ActivityRecord, CommitLink, DayActivity, OrgActivity, PrLink, RepoActivity,
};
pub use summary::{ActivitySummary, AgencySummary};
