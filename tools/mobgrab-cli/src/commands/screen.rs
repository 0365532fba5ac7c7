//! Record the device screen while browsing the feed.

use std::path::PathBuf;

use mobgrab_capture_engine::recorders;
use mobgrab_common::config::AppConfig;

pub async fn run(
    config: &AppConfig,
    duration: Option<u64>,
    output: PathBuf,
    prefix: String,
    swipe: bool,
) -> anyhow::Result<()> {
    let plan_duration = super::duration_from(config, duration);
    println!("Recording screen for {}s", plan_duration.as_secs());
    println!("  Output: {}", output.display());
    println!();

    std::fs::create_dir_all(&output)?;

    let mut plan = super::base_plan(config, duration, swipe);
    plan.jobs = vec![recorders::screen_recorder(&output, &prefix)];

    super::execute(config, plan).await
}
