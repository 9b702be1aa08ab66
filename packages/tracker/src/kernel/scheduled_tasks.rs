//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Both runs share one cron expression (daily by default):
//! - Jobs run: fetch USAJobs, classify, aggregate, validate
//! - Activity run: fetch GitHub activity for the agency registry
//!
//! A failing run is logged; the scheduler keeps going and tries again at the
//! next tick.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::Config;
use crate::domains::activity::{run_activity, FEDERAL_AGENCIES};
use crate::domains::jobs::run_jobs;
use crate::kernel::TrackerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: TrackerDeps, config: Config) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;
    let config = Arc::new(config);

    let jobs_deps = deps.clone();
    let jobs_config = config.clone();
    let jobs_job = Job::new_async(config.schedule.as_str(), move |_uuid, _lock| {
        let deps = jobs_deps.clone();
        let config = jobs_config.clone();
        Box::pin(async move {
            if let Err(e) = run_scheduled_jobs(&deps, &config).await {
                tracing::error!("Scheduled jobs run failed: {:#}", e);
            }
        })
    })?;

    scheduler.add(jobs_job).await?;

    let activity_deps = deps.clone();
    let activity_config = config.clone();
    let activity_job = Job::new_async(config.schedule.as_str(), move |_uuid, _lock| {
        let deps = activity_deps.clone();
        let config = activity_config.clone();
        Box::pin(async move {
            if let Err(e) = run_scheduled_activity(&deps, &config).await {
                tracing::error!("Scheduled activity run failed: {:#}", e);
            }
        })
    })?;

    scheduler.add(activity_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %config.schedule, "Scheduled tasks started (jobs and activity)");
    Ok(scheduler)
}

async fn run_scheduled_jobs(deps: &TrackerDeps, config: &Config) -> Result<()> {
    tracing::info!("Running scheduled jobs run");

    let outcome = run_jobs(deps.job_search.as_ref(), config, Utc::now()).await?;
    if outcome.validation.ok {
        tracing::info!(path = %outcome.metrics_path.display(), "Jobs run passed integrity checks");
    } else {
        tracing::error!(
            violations = outcome.validation.violations.len(),
            "Jobs run failed integrity checks; published metrics should not be deployed"
        );
    }

    Ok(())
}

async fn run_scheduled_activity(deps: &TrackerDeps, config: &Config) -> Result<()> {
    tracing::info!("Running scheduled activity run");

    let outcome = run_activity(
        deps.code_host.as_ref(),
        FEDERAL_AGENCIES,
        &config.output_dir,
        config.activity_days,
        Utc::now(),
    )
    .await?;

    if !outcome.is_ok() {
        for violation in &outcome.violations {
            tracing::error!("{}", violation);
        }
    }

    Ok(())
}
