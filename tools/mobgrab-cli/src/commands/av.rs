//! Record screen and audio simultaneously, then merge into one container.

use std::path::PathBuf;

use mobgrab_capture_engine::recorders;
use mobgrab_common::config::AppConfig;
use mobgrab_runner::merge_output_path;

pub async fn run(
    config: &AppConfig,
    duration: Option<u64>,
    output: PathBuf,
    prefix: String,
    swipe: bool,
) -> anyhow::Result<()> {
    let plan_duration = super::duration_from(config, duration);
    let duration_secs = plan_duration.as_secs();
    println!("Recording screen and audio for {duration_secs}s, merging afterwards");
    println!("  Output: {}", output.display());
    println!();

    std::fs::create_dir_all(&output)?;

    let mut plan = super::base_plan(config, duration, swipe);
    plan.jobs = vec![
        recorders::screen_recorder(&output, &prefix),
        recorders::device_audio_recorder(&output, &prefix, duration_secs),
    ];
    plan.merge_output = Some(merge_output_path(&output, &prefix));

    super::execute(config, plan).await
}
