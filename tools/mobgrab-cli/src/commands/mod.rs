//! CLI subcommands. Each builds a [`RunPlan`] and hands it to the shared
//! executor; the four commands are presets over the same orchestrator.

pub mod audio;
pub mod av;
pub mod download;
pub mod screen;

use std::time::Duration;

use mobgrab_common::config::AppConfig;
use mobgrab_driver::WebDriverSession;
use mobgrab_runner::{Orchestrator, RunPlan};

/// Open the session, run the plan, and print what the run produced.
pub(crate) async fn execute(config: &AppConfig, plan: RunPlan) -> anyhow::Result<()> {
    let session = WebDriverSession::open(&config.driver).await?;
    let mut orchestrator = Orchestrator::new(session);
    let report = orchestrator.run(&plan).await?;

    for job in &report.jobs {
        println!("  {} -> {}", job.kind, job.output_path.display());
    }
    if let Some(path) = &report.merged_path {
        println!("  merged -> {}", path.display());
    }
    for file in &report.extracted {
        println!("  pulled -> {}", file.display());
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }

    Ok(())
}

/// Recording duration: CLI flag wins over the configured default.
pub(crate) fn duration_from(config: &AppConfig, duration_secs: Option<u64>) -> Duration {
    Duration::from_secs(duration_secs.unwrap_or(config.recording.duration_secs))
}

/// Base plan with the configured timing defaults applied.
pub(crate) fn base_plan(config: &AppConfig, duration_secs: Option<u64>, swipe: bool) -> RunPlan {
    let mut plan = RunPlan::bare(duration_from(config, duration_secs));
    plan.grace = Duration::from_secs(config.recording.grace_secs);
    plan.settle = Duration::from_secs(config.recording.settle_secs);
    plan.swipe_next = swipe;
    plan
}
