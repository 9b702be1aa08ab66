//! Command-line entry point for the tracker.
//!
//! Exit status 1 means the run wrote its output but failed an integrity
//! check; deployment should be skipped.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker_core::config::Config;
use tracker_core::domains::activity::{run_activity, FEDERAL_AGENCIES};
use tracker_core::domains::integrity::ValidationResult;
use tracker_core::domains::jobs::activities::metrics_path;
use tracker_core::domains::jobs::{classify_with_rule, run_jobs, validate_history};
use tracker_core::kernel::{
    code_host_from_config, job_search_from_config, start_scheduler, SnapshotStore, TrackerDeps,
};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Federal IT job title and GitHub activity tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch job announcements, publish metrics and validate against the previous run
    Jobs,

    /// Validate the newest snapshot against the last one that passed
    Validate,

    /// Fetch GitHub activity for the agency registry
    Activity {
        /// Look-back window in days (defaults to TRACKER_ACTIVITY_DAYS)
        #[arg(long)]
        days: Option<i64>,
    },

    /// Classify job titles and show which rule matched
    Classify {
        #[arg(required = true)]
        titles: Vec<String>,
    },

    /// Run jobs and activity on the configured cron schedule until interrupted
    Schedule,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tracker_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { titles } => {
            for title in &titles {
                let (label, rule) = classify_with_rule(title);
                println!("{}\t{}\t{}", label, rule.unwrap_or("-"), title);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Jobs => {
            let config = Config::from_env()?;
            let search = job_search_from_config(&config)?;
            let outcome = run_jobs(search.as_ref(), &config, Utc::now()).await?;
            println!(
                "{} jobs, {} IT Specialist ({}%), written to {}",
                outcome.snapshot.metrics.total_jobs,
                outcome.snapshot.metrics.it_specialist_count,
                outcome.snapshot.metrics.percentage,
                outcome.metrics_path.display()
            );
            Ok(report(&outcome.validation))
        }
        Commands::Validate => {
            let config = Config::from_env()?;
            let store = SnapshotStore::new(&config.history_dir, &config.series);
            let result = validate_history(&store, &config.integrity, &metrics_path(&config))?;
            Ok(report(&result))
        }
        Commands::Activity { days } => {
            let config = Config::from_env()?;
            let host = code_host_from_config(&config)?;
            let outcome = run_activity(
                host.as_ref(),
                FEDERAL_AGENCIES,
                &config.output_dir,
                days.unwrap_or(config.activity_days),
                Utc::now(),
            )
            .await?;
            println!(
                "{}/{} agencies accessible, {} active, {} commits, {} PRs",
                outcome.summary.accessible_agencies(),
                outcome.summary.total_agencies,
                outcome.summary.active_agencies,
                outcome.summary.total_commits,
                outcome.summary.total_prs
            );
            for violation in &outcome.violations {
                eprintln!("  {}", violation);
            }
            Ok(if outcome.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Schedule => {
            let config = Config::from_env()?;
            let deps = TrackerDeps::from_config(&config)?;
            let mut scheduler = start_scheduler(deps, config).await?;

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutting down scheduler");
            scheduler.shutdown().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(result: &ValidationResult) -> ExitCode {
    if result.ok {
        println!("Integrity checks passed");
        return ExitCode::SUCCESS;
    }

    eprintln!("Integrity checks failed:");
    for message in result.messages() {
        eprintln!("  {}", message);
    }
    ExitCode::FAILURE
}
