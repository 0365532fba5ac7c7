//! External recorder process lifecycle.
//!
//! Wraps one spawned recorder behind a start / graceful-stop / await-exit
//! interface so the control logic never depends on OS-specific invocation
//! syntax. A non-zero exit is reported as data, not an error; the
//! orchestrator decides whether it is fatal.

use std::process::Stdio;

use mobgrab_common::error::{MobgrabError, MobgrabResult};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

/// Maximum stderr tail retained for diagnostics.
const STDERR_EXCERPT_LEN: usize = 512;

/// Final result of one recorder process.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Exit code; `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,

    /// Tail of the process's stderr output.
    pub stderr_excerpt: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// One spawned external recorder.
pub struct ProcessHandle {
    program: String,
    child: Child,
    stderr_task: Option<tokio::task::JoinHandle<String>>,
}

impl ProcessHandle {
    /// Spawn the recorder with stderr captured.
    pub fn spawn(program: &str, args: &[String]) -> MobgrabResult<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MobgrabError::capture(format!("failed to start {program}: {e}")))?;

        // Drain stderr concurrently so the recorder cannot block on a full
        // pipe while the control thread is sleeping out the budget.
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut output = String::new();
                match stderr.read_to_string(&mut output).await {
                    Ok(_) => tail(&output),
                    Err(e) => format!("<failed to read recorder stderr: {e}>"),
                }
            })
        });

        tracing::info!(program, pid = child.id(), ?args, "Recorder process started");

        Ok(Self {
            program: program.to_string(),
            child,
            stderr_task,
        })
    }

    /// OS process id, while the process is running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Whether the process has not yet been reaped.
    pub fn is_running(&self) -> bool {
        self.child.id().is_some()
    }

    /// Send a graceful interrupt so the recorder can finalize its output
    /// file. Calling this on an already-exited process is a no-op, never an
    /// error.
    pub fn stop(&mut self) {
        let Some(pid) = self.child.id() else {
            return;
        };
        tracing::debug!(pid, program = %self.program, "Interrupting recorder");
        self.interrupt(pid);
    }

    #[cfg(unix)]
    fn interrupt(&mut self, pid: u32) {
        // SAFETY: pid belongs to a child we hold unreaped, so it cannot
        // have been recycled.
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGINT);
        }
    }

    #[cfg(not(unix))]
    fn interrupt(&mut self, _pid: u32) {
        let _ = self.child.start_kill();
    }

    /// Terminate the process immediately. Used when a recorder ignores the
    /// graceful interrupt past the grace period.
    pub fn force_stop(&mut self) {
        if self.child.id().is_some() {
            tracing::warn!(program = %self.program, "Force-killing recorder");
            let _ = self.child.start_kill();
        }
    }

    /// Wait for the process to exit and collect its outcome. Resolves
    /// exactly once per process with the final exit code.
    pub async fn wait(&mut self) -> ProcessOutcome {
        let status = self.child.wait().await;

        let stderr_excerpt = match self.stderr_task.take() {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        match status {
            Ok(status) => ProcessOutcome {
                exit_code: status.code(),
                stderr_excerpt,
            },
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "Failed to wait on recorder");
                ProcessOutcome {
                    exit_code: None,
                    stderr_excerpt,
                }
            }
        }
    }
}

fn tail(s: &str) -> String {
    let trimmed = s.trim();
    match trimmed.char_indices().nth_back(STDERR_EXCERPT_LEN) {
        Some((idx, _)) => trimmed[idx..].to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_exit_reports_code_zero() {
        let mut handle = ProcessHandle::spawn("true", &[]).unwrap();
        let outcome = handle.wait().await;
        assert_eq!(outcome.exit_code, Some(0));
        assert!(outcome.success());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported_not_raised() {
        let mut handle = ProcessHandle::spawn("false", &[]).unwrap();
        let outcome = handle.wait().await;
        assert_eq!(outcome.exit_code, Some(1));
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn test_stderr_excerpt_captured() {
        let mut handle = ProcessHandle::spawn(
            "sh",
            &["-c".to_string(), "echo recorder exploded >&2; exit 3".to_string()],
        )
        .unwrap();
        let outcome = handle.wait().await;
        assert_eq!(outcome.exit_code, Some(3));
        assert!(outcome.stderr_excerpt.contains("recorder exploded"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_interrupts_long_running_process() {
        let mut handle = ProcessHandle::spawn("sleep", &["30".to_string()]).unwrap();
        let start = std::time::Instant::now();
        handle.stop();
        let outcome = handle.wait().await;
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        // Terminated by SIGINT, so no exit code.
        assert_eq!(outcome.exit_code, None);
    }

    #[tokio::test]
    async fn test_stop_after_exit_is_noop() {
        let mut handle = ProcessHandle::spawn("true", &[]).unwrap();
        let _ = handle.wait().await;
        assert!(!handle.is_running());
        handle.stop();
        handle.stop();
    }

    #[test]
    fn test_tail_truncates_long_output() {
        let long = "x".repeat(4096);
        assert!(tail(&long).len() <= STDERR_EXCERPT_LEN + 1);
        assert_eq!(tail("short"), "short");
    }

    #[tokio::test]
    async fn test_missing_program_is_a_capture_error() {
        let result = ProcessHandle::spawn("mobgrab-no-such-recorder", &[]);
        assert!(matches!(
            result,
            Err(mobgrab_common::error::MobgrabError::Capture { .. })
        ));
    }
}
