//! Save the current item through the app's share sheet and pull it from the
//! device, recording host audio alongside.

use std::path::PathBuf;
use std::time::Duration;

use mobgrab_capture_engine::recorders;
use mobgrab_common::config::AppConfig;
use mobgrab_runner::{DownloadStep, ExtractStep};

pub async fn run(
    config: &AppConfig,
    duration: Option<u64>,
    output: PathBuf,
    prefix: String,
    remote_dir: Option<String>,
    swipe: bool,
) -> anyhow::Result<()> {
    let plan_duration = super::duration_from(config, duration);
    let duration_secs = plan_duration.as_secs();
    let remote_path = remote_dir.unwrap_or_else(|| config.recording.remote_media_dir.clone());
    println!("Saving current item in-app, then pulling {remote_path}");
    println!("  Local dir: {}", output.display());
    println!();

    std::fs::create_dir_all(&output)?;

    let mut plan = super::base_plan(config, duration, swipe);
    plan.jobs = vec![recorders::host_audio_recorder(
        &output,
        &prefix,
        &config.recording.audio_device,
        duration_secs,
    )];
    plan.download = Some(DownloadStep {
        share_selector: config.download.share_selector.clone(),
        save_selector: config.download.save_selector.clone(),
        element_timeout: Duration::from_secs(config.download.element_timeout_secs),
        menu_settle: Duration::from_secs(config.download.menu_settle_secs),
    });
    plan.extract = Some(ExtractStep {
        remote_path,
        local_dir: output,
    });

    super::execute(config, plan).await
}
