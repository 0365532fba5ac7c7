//! Capture session coordination.
//!
//! A session starts every requested recorder back-to-back (skew bounded by
//! process-spawn latency; this is best-effort AV capture, not frame-accurate
//! sync), holds them for a fixed duration budget, interrupts the ones that
//! cannot stop themselves, and collects one result per job.

use std::time::Duration;

use mobgrab_common::error::{MobgrabError, MobgrabResult};
use tokio::time::Instant;

use crate::process::ProcessHandle;
use crate::recorders::{JobKind, JobSpec};

/// Default extra wait past the duration budget before force-stopping.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// How one capture job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// The recorder exited; `None` means it was terminated by signal
    /// (expected for interrupted screen recorders).
    Completed(Option<i32>),

    /// The recorder ignored its interrupt past the grace period and was
    /// force-killed.
    TimedOut,
}

/// Per-job result returned by [`CaptureSession::await_completion`].
#[derive(Debug)]
pub struct JobResult {
    pub kind: JobKind,
    pub output_path: std::path::PathBuf,
    pub status: JobStatus,
    pub stderr_excerpt: String,
}

struct RecordingJob {
    kind: JobKind,
    output_path: std::path::PathBuf,
    self_terminating: bool,
    handle: ProcessHandle,
}

/// One or more recorders running against a shared duration budget.
///
/// Owns its jobs exclusively; each job's handle is released once its
/// completion fires or it is force-terminated on timeout.
pub struct CaptureSession {
    jobs: Vec<RecordingJob>,
    duration: Duration,
    grace: Duration,
    started: Instant,
}

impl CaptureSession {
    /// Start every requested recorder. At most one job per kind is allowed;
    /// duplicates are rejected before anything is spawned.
    pub fn begin(specs: Vec<JobSpec>, duration: Duration) -> MobgrabResult<Self> {
        for (i, a) in specs.iter().enumerate() {
            if specs[i + 1..].iter().any(|b| b.kind == a.kind) {
                return Err(MobgrabError::capture(format!(
                    "duplicate {} job in capture session",
                    a.kind
                )));
            }
        }

        let started = Instant::now();
        let mut jobs: Vec<RecordingJob> = Vec::with_capacity(specs.len());
        for spec in specs {
            let handle = match ProcessHandle::spawn(&spec.program, &spec.args) {
                Ok(handle) => handle,
                Err(e) => {
                    // Don't leave earlier recorders running against a
                    // session that never existed.
                    for job in &mut jobs {
                        job.handle.stop();
                    }
                    return Err(e);
                }
            };
            tracing::info!(
                kind = %spec.kind,
                output = %spec.output_path.display(),
                "Capture job started"
            );
            jobs.push(RecordingJob {
                kind: spec.kind,
                output_path: spec.output_path,
                self_terminating: spec.self_terminating,
                handle,
            });
        }

        Ok(Self {
            jobs,
            duration,
            grace: DEFAULT_GRACE,
            started,
        })
    }

    /// Override the grace period (tests use a short one).
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Kinds currently recording.
    pub fn kinds(&self) -> Vec<JobKind> {
        self.jobs.iter().map(|j| j.kind).collect()
    }

    /// Sleep out the remaining duration budget, interrupt recorders that
    /// cannot stop themselves, and collect every job's result.
    ///
    /// Never blocks past `duration + grace`: a job that ignores its
    /// interrupt is force-killed and reported as [`JobStatus::TimedOut`].
    pub async fn await_completion(mut self) -> Vec<JobResult> {
        // Relative to session start, so callers that already waited out the
        // budget (e.g. while driving gestures) fall through immediately.
        tokio::time::sleep_until(self.started + self.duration).await;

        for job in &mut self.jobs {
            if !job.self_terminating {
                job.handle.stop();
            }
        }

        let deadline = self.started + self.duration + self.grace;
        let mut results = Vec::with_capacity(self.jobs.len());
        for mut job in self.jobs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let (status, stderr_excerpt) =
                match tokio::time::timeout(remaining, job.handle.wait()).await {
                    Ok(outcome) => {
                        tracing::info!(
                            kind = %job.kind,
                            exit_code = ?outcome.exit_code,
                            output = %job.output_path.display(),
                            "Capture job finished"
                        );
                        (JobStatus::Completed(outcome.exit_code), outcome.stderr_excerpt)
                    }
                    Err(_) => {
                        tracing::warn!(
                            kind = %job.kind,
                            grace_secs = self.grace.as_secs_f64(),
                            "Recorder did not exit within grace period; force-stopping"
                        );
                        job.handle.force_stop();
                        (JobStatus::TimedOut, String::new())
                    }
                };
            results.push(JobResult {
                kind: job.kind,
                output_path: job.output_path,
                status,
                stderr_excerpt,
            });
        }
        results
    }
}
