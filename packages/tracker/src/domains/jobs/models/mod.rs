pub mod job_record;
pub mod metrics;
pub mod snapshot;

pub use job_record::{collect_records, JobRecord, RecordError, SkipSummary};
pub use metrics::{MetricsSnapshot, MostRecentPosting};
pub use snapshot::JobsSnapshot;
