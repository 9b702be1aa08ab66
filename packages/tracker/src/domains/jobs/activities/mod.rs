pub mod run_jobs;
pub mod validate_history;

pub use run_jobs::{metrics_path, run_jobs, JobsRunOutcome};
pub use validate_history::{validate_history, validate_snapshots};
