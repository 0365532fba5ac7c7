//! Record device or host audio while browsing the feed.

use std::path::PathBuf;

use mobgrab_capture_engine::recorders;
use mobgrab_common::config::AppConfig;

pub async fn run(
    config: &AppConfig,
    duration: Option<u64>,
    output: PathBuf,
    prefix: String,
    host_device: Option<String>,
    swipe: bool,
) -> anyhow::Result<()> {
    let plan_duration = super::duration_from(config, duration);
    let duration_secs = plan_duration.as_secs();
    println!("Recording audio for {duration_secs}s");
    println!("  Output: {}", output.display());
    println!();

    std::fs::create_dir_all(&output)?;

    let job = match &host_device {
        Some(device) => recorders::host_audio_recorder(&output, &prefix, device, duration_secs),
        None => recorders::device_audio_recorder(&output, &prefix, duration_secs),
    };

    let mut plan = super::base_plan(config, duration, swipe);
    plan.jobs = vec![job];

    super::execute(config, plan).await
}
