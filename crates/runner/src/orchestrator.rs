//! The run orchestrator.
//!
//! Sequences one run end to end. Transitions are strictly sequential; the
//! only concurrency is the recorder processes themselves, which run in the
//! OS process table while the control thread drives gestures. Session
//! teardown is the one guaranteed cleanup action on every path.

use std::path::PathBuf;

use mobgrab_capture_engine::{CaptureSession, JobKind, JobResult, JobStatus};
use mobgrab_common::error::{MobgrabError, MobgrabResult};
use mobgrab_common::naming;
use mobgrab_driver::{gesture, AutomationSession, GestureSpec};
use mobgrab_media::{ArtifactExtractor, MediaMerger, MergeRequest};

use crate::plan::RunPlan;

/// Where the orchestrator currently is in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    SessionOpen,
    Recording,
    GestureInFlight,
    AwaitingRecorders,
    Merging,
    Extracting,
    SessionClosed,
}

/// What one run produced. Non-fatal failures are collected as warnings
/// instead of aborting the run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub jobs: Vec<JobResult>,
    pub merged_path: Option<PathBuf>,
    pub extracted: Vec<PathBuf>,
    pub warnings: Vec<MobgrabError>,
}

impl RunReport {
    /// Output path of a completed job of the given kind, if any.
    fn completed_path(&self, kind: JobKind) -> Option<PathBuf> {
        self.jobs
            .iter()
            .find(|j| j.kind == kind && matches!(j.status, JobStatus::Completed(_)))
            .map(|j| j.output_path.clone())
    }
}

/// Drives one run against a live automation session.
pub struct Orchestrator<S> {
    session: S,
    state: RunState,
    merger: MediaMerger,
    extractor: ArtifactExtractor,
}

impl<S: AutomationSession> Orchestrator<S> {
    /// Wrap an already-open session.
    pub fn new(session: S) -> Self {
        Self {
            session,
            state: RunState::Idle,
            merger: MediaMerger::new(),
            extractor: ArtifactExtractor::new(),
        }
    }

    /// Substitute the external merge/pull tools (stubs in tests).
    pub fn with_tools(session: S, merger: MediaMerger, extractor: ArtifactExtractor) -> Self {
        Self {
            session,
            state: RunState::Idle,
            merger,
            extractor,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the plan. The remote session is torn down on every path,
    /// including errors; the error from the run itself wins over any
    /// teardown failure.
    pub async fn run(&mut self, plan: &RunPlan) -> MobgrabResult<RunReport> {
        if self.state != RunState::Idle {
            return Err(MobgrabError::session("orchestrator already ran"));
        }
        self.state = RunState::SessionOpen;

        let result = self.run_inner(plan).await;

        if let Err(e) = self.session.delete_session().await {
            tracing::warn!(error = %e, "Failed to close automation session");
        }
        self.state = RunState::SessionClosed;

        result
    }

    async fn run_inner(&mut self, plan: &RunPlan) -> MobgrabResult<RunReport> {
        let mut report = RunReport::default();

        if !plan.settle.is_zero() {
            tracing::info!(secs = plan.settle.as_secs_f64(), "Waiting for app to settle");
            self.session.pause(plan.settle).await?;
        }

        let capture = if plan.jobs.is_empty() {
            None
        } else {
            let session = CaptureSession::begin(plan.jobs.clone(), plan.duration)?
                .with_grace(plan.grace);
            self.state = RunState::Recording;
            Some(session)
        };

        // Device-side actions start partway into the recording window so
        // the recorded footage contains them. The capture session measures
        // its budget from its own start; the rest of the window elapses
        // inside await_completion below.
        if capture.is_some() && !plan.gesture_delay.is_zero() {
            self.session.pause(plan.gesture_delay).await?;
        }

        if let Some(download) = &plan.download {
            self.state = RunState::GestureInFlight;
            tracing::info!("Saving current item in-app");
            self.session
                .wait_and_click(&download.share_selector, download.element_timeout)
                .await?;
            self.session.pause(download.menu_settle).await?;
            self.session
                .wait_and_click(&download.save_selector, download.element_timeout)
                .await?;
        }

        if plan.swipe_next {
            self.state = RunState::GestureInFlight;
            let window = self.session.window_size().await?;
            let spec =
                GestureSpec::from_fractions(window, gesture::SCROLL_NEXT, gesture::DEFAULT_SWIPE_MS);
            gesture::swipe(&self.session, &spec).await?;
            tracing::info!("Swiped to next item");
        }

        if let Some(capture) = capture {
            self.state = RunState::AwaitingRecorders;
            let results = capture.await_completion().await;
            for result in &results {
                match result.status {
                    JobStatus::Completed(Some(code)) if code != 0 => {
                        tracing::warn!(
                            kind = %result.kind,
                            code,
                            stderr = %result.stderr_excerpt,
                            "Recorder exited non-zero; continuing with partial artifact"
                        );
                        report.warnings.push(MobgrabError::RecorderExit {
                            kind: result.kind.to_string(),
                            exit_code: code,
                        });
                    }
                    JobStatus::TimedOut => {
                        tracing::warn!(kind = %result.kind, "Recorder timed out and was force-stopped");
                        report.warnings.push(MobgrabError::capture(format!(
                            "{} recorder timed out",
                            result.kind
                        )));
                    }
                    JobStatus::Completed(_) => {}
                }
            }
            report.jobs = results;
        }

        if let Some(merge_output) = &plan.merge_output {
            // Both contributing jobs have reported completion by now; merge
            // never runs against a still-open file.
            match (
                report.completed_path(JobKind::Video),
                report.completed_path(JobKind::Audio),
            ) {
                (Some(video_path), Some(audio_path)) => {
                    self.state = RunState::Merging;
                    let request = MergeRequest {
                        video_path,
                        audio_path,
                        output_path: merge_output.clone(),
                    };
                    match self.merger.merge(&request).await {
                        Ok(path) => report.merged_path = Some(path),
                        Err(e) => {
                            tracing::error!(error = %e, "Merge failed; raw streams preserved");
                            report.warnings.push(e);
                        }
                    }
                }
                _ => {
                    tracing::warn!("Merge requested but both streams did not complete; skipping");
                }
            }
        }

        if let Some(extract) = &plan.extract {
            self.state = RunState::Extracting;
            match self
                .extractor
                .extract(&extract.remote_path, &extract.local_dir)
                .await
            {
                Ok(files) => report.extracted = files,
                Err(e) => {
                    tracing::error!(error = %e, "Extraction failed; capture results unaffected");
                    report.warnings.push(e);
                }
            }
        }

        Ok(report)
    }
}

/// Derive a merge output path alongside the capture artifacts.
pub fn merge_output_path(output_dir: &std::path::Path, prefix: &str) -> PathBuf {
    naming::artifact_path(output_dir, &format!("{prefix}_combined"), "mp4")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{DownloadStep, ExtractStep, RunPlan};
    use async_trait::async_trait;
    use mobgrab_capture_engine::{JobKind, JobSpec};
    use mobgrab_driver::session::WindowSize;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Scripted session recording every call it receives and when.
    #[derive(Clone)]
    struct MockSession {
        calls: Arc<Mutex<Vec<(String, Duration)>>>,
        created: std::time::Instant,
        fail_actions: bool,
    }

    impl Default for MockSession {
        fn default() -> Self {
            Self {
                calls: Arc::default(),
                created: std::time::Instant::now(),
                fail_actions: false,
            }
        }
    }

    impl MockSession {
        fn log(&self, call: &str) {
            self.calls
                .lock()
                .unwrap()
                .push((call.to_string(), self.created.elapsed()));
        }

        fn calls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(call, _)| call.clone())
                .collect()
        }

        fn elapsed_at(&self, call: &str) -> Option<Duration> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .find(|(c, _)| c == call)
                .map(|(_, at)| *at)
        }
    }

    #[async_trait]
    impl AutomationSession for MockSession {
        async fn perform_actions(&self, actions: serde_json::Value) -> MobgrabResult<()> {
            self.log("perform_actions");
            if self.fail_actions {
                return Err(MobgrabError::session("action delivery refused"));
            }
            // One atomic pointer chain per gesture.
            assert_eq!(actions["actions"].as_array().unwrap().len(), 1);
            Ok(())
        }

        async fn release_actions(&self) -> MobgrabResult<()> {
            self.log("release_actions");
            Ok(())
        }

        async fn window_size(&self) -> MobgrabResult<WindowSize> {
            self.log("window_size");
            Ok(WindowSize {
                width: 1080,
                height: 2400,
            })
        }

        async fn pause(&self, duration: Duration) -> MobgrabResult<()> {
            self.log("pause");
            tokio::time::sleep(duration).await;
            Ok(())
        }

        async fn wait_and_click(&self, selector: &str, _timeout: Duration) -> MobgrabResult<()> {
            self.log(&format!("click:{selector}"));
            Ok(())
        }

        async fn delete_session(&self) -> MobgrabResult<()> {
            self.log("delete_session");
            Ok(())
        }
    }

    /// A stub recorder that creates its output file, then idles briefly.
    fn stub_recorder(kind: JobKind, path: &str) -> JobSpec {
        JobSpec {
            kind,
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                format!("touch {path}; sleep 0.2"),
            ],
            output_path: path.into(),
            self_terminating: true,
        }
    }

    fn full_plan() -> RunPlan {
        let video = format!("/tmp/mobgrab_run_video_{}.mp4", std::process::id());
        let audio = format!("/tmp/mobgrab_run_audio_{}.wav", std::process::id());
        RunPlan {
            jobs: vec![
                stub_recorder(JobKind::Video, &video),
                stub_recorder(JobKind::Audio, &audio),
            ],
            duration: Duration::from_millis(250),
            grace: Duration::from_secs(1),
            settle: Duration::from_millis(10),
            gesture_delay: Duration::from_millis(50),
            swipe_next: true,
            download: None,
            merge_output: Some(PathBuf::from("/tmp/mobgrab_run_combined.mp4")),
            extract: None,
        }
    }

    #[tokio::test]
    async fn test_full_run_sequences_and_merges() {
        let session = MockSession::default();
        let mut orchestrator = Orchestrator::with_tools(
            session.clone(),
            MediaMerger::with_program("true"),
            ArtifactExtractor::new(),
        );

        let report = orchestrator.run(&full_plan()).await.unwrap();

        assert_eq!(report.jobs.len(), 2);
        for job in &report.jobs {
            assert!(matches!(job.status, JobStatus::Completed(Some(0))));
        }
        // Merge only ran because both jobs completed first.
        assert!(report.merged_path.is_some());
        assert!(report.warnings.is_empty());
        assert_eq!(orchestrator.state(), RunState::SessionClosed);

        let calls = session.calls();
        assert_eq!(calls.last().map(String::as_str), Some("delete_session"));
        let swipe_at = calls.iter().position(|c| c == "perform_actions").unwrap();
        let release_at = calls.iter().position(|c| c == "release_actions").unwrap();
        assert!(swipe_at < release_at);
    }

    #[tokio::test]
    async fn test_swipe_lands_inside_recording_window() {
        let session = MockSession::default();
        let mut orchestrator = Orchestrator::with_tools(
            session.clone(),
            MediaMerger::with_program("true"),
            ArtifactExtractor::new(),
        );

        let mut plan = full_plan();
        plan.duration = Duration::from_millis(400);
        plan.gesture_delay = Duration::from_millis(100);
        plan.settle = Duration::ZERO;

        let report = orchestrator.run(&plan).await.unwrap();
        assert_eq!(report.jobs.len(), 2);

        let swipe_at = session.elapsed_at("perform_actions").unwrap();
        assert!(swipe_at >= Duration::from_millis(100));
        assert!(
            swipe_at < Duration::from_millis(400),
            "swipe at {swipe_at:?}, after the recording window closed"
        );
    }

    #[tokio::test]
    async fn test_gesture_failure_still_tears_down_session() {
        let session = MockSession {
            fail_actions: true,
            ..MockSession::default()
        };
        let mut orchestrator = Orchestrator::new(session.clone());

        let mut plan = RunPlan::bare(Duration::from_millis(50));
        plan.swipe_next = true;

        let result = orchestrator.run(&plan).await;
        assert!(matches!(result, Err(MobgrabError::Gesture { .. })));
        assert_eq!(orchestrator.state(), RunState::SessionClosed);
        assert_eq!(
            session.calls().last().map(String::as_str),
            Some("delete_session")
        );
    }

    #[tokio::test]
    async fn test_download_precedes_extraction() {
        let session = MockSession::default();
        let local_dir = format!("/tmp/mobgrab_extract_{}", std::process::id());
        let mut orchestrator = Orchestrator::with_tools(
            session.clone(),
            MediaMerger::new(),
            // `true` copies nothing; an empty extraction is still a success.
            ArtifactExtractor::with_program("true"),
        );

        let mut plan = RunPlan::bare(Duration::from_millis(10));
        plan.download = Some(DownloadStep {
            share_selector: "//share".to_string(),
            save_selector: "//save".to_string(),
            element_timeout: Duration::from_secs(1),
            menu_settle: Duration::from_millis(10),
        });
        plan.extract = Some(ExtractStep {
            remote_path: "/sdcard/DCIM/Camera".to_string(),
            local_dir: local_dir.clone().into(),
        });

        let report = orchestrator.run(&plan).await.unwrap();
        assert!(report.extracted.is_empty());

        let calls = session.calls();
        let share_at = calls.iter().position(|c| c == "click://share").unwrap();
        let save_at = calls.iter().position(|c| c == "click://save").unwrap();
        assert!(share_at < save_at);
    }

    #[tokio::test]
    async fn test_merge_failure_is_warning_not_abort() {
        let session = MockSession::default();
        let mut orchestrator = Orchestrator::with_tools(
            session.clone(),
            MediaMerger::with_program("false"),
            ArtifactExtractor::new(),
        );

        let report = orchestrator.run(&full_plan()).await.unwrap();
        assert!(report.merged_path.is_none());
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, MobgrabError::Merge { .. })));
        // Raw capture artifacts survive the failed merge.
        assert_eq!(report.jobs.len(), 2);
    }

    #[tokio::test]
    async fn test_run_is_single_use() {
        let session = MockSession::default();
        let mut orchestrator = Orchestrator::new(session);
        let plan = RunPlan::bare(Duration::from_millis(1));
        orchestrator.run(&plan).await.unwrap();
        assert!(orchestrator.run(&plan).await.is_err());
    }
}
