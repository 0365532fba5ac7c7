//! Run plans.
//!
//! A plan is a pure value describing which optional steps a run performs.
//! Capture jobs are fully specified up front (output paths included), so
//! the orchestrator never invents state mid-run.

use std::path::PathBuf;
use std::time::Duration;

use mobgrab_capture_engine::JobSpec;

/// The in-app "save current item" flow: share button, then the save option
/// in the share sheet.
#[derive(Debug, Clone)]
pub struct DownloadStep {
    pub share_selector: String,
    pub save_selector: String,
    pub element_timeout: Duration,

    /// Wait for the share sheet to finish animating before clicking save.
    pub menu_settle: Duration,
}

/// Post-run bulk pull of device-resident media.
#[derive(Debug, Clone)]
pub struct ExtractStep {
    pub remote_path: String,
    pub local_dir: PathBuf,
}

/// Everything one orchestrated run will do.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Recorder jobs to run against the duration budget. May be empty for
    /// interaction-only runs.
    pub jobs: Vec<JobSpec>,

    /// Recording duration budget.
    pub duration: Duration,

    /// Extra wait for recorders past the budget before force-stopping.
    pub grace: Duration,

    /// Wait before capture starts, letting the app finish loading.
    pub settle: Duration,

    /// How far into the recording window device-side actions (swipe,
    /// in-app download) start. The capture budget keeps running while they
    /// execute, so the gesture lands inside the recorded footage rather
    /// than after it.
    pub gesture_delay: Duration,

    /// Swipe to the next feed item during the recording window.
    pub swipe_next: bool,

    /// In-app download of the current item, if any.
    pub download: Option<DownloadStep>,

    /// Merge target for the captured video+audio pair, if any. The path is
    /// computed once at plan build time and never reused.
    pub merge_output: Option<PathBuf>,

    /// Device artifact extraction, if any.
    pub extract: Option<ExtractStep>,
}

impl RunPlan {
    /// A plan with no optional steps and no capture jobs.
    pub fn bare(duration: Duration) -> Self {
        Self {
            jobs: Vec::new(),
            duration,
            grace: mobgrab_capture_engine::DEFAULT_GRACE,
            settle: Duration::ZERO,
            gesture_delay: duration / 2,
            swipe_next: false,
            download: None,
            merge_output: None,
            extract: None,
        }
    }
}
