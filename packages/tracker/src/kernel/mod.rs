//! Kernel module - infrastructure and dependencies.

pub mod deps;
pub mod scheduled_tasks;
pub mod snapshot_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{
    code_host_from_config, job_search_from_config, GithubAdapter, TrackerDeps, UsaJobsAdapter,
};
pub use scheduled_tasks::start_scheduler;
pub use snapshot_store::SnapshotStore;
pub use test_dependencies::{MockCodeHost, MockFailure, MockJobSearch, TestDependencies};
pub use traits::*;
