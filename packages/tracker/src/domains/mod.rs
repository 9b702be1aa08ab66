// Business domains
pub mod activity;
pub mod integrity;
pub mod jobs;
