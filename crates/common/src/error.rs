//! Error types shared across mobgrab crates.
//!
//! The orchestrator is the single point deciding which of these are fatal
//! for a run; components report structured errors rather than terminating
//! the process.

/// Top-level error type for mobgrab operations.
#[derive(Debug, thiserror::Error)]
pub enum MobgrabError {
    /// The automation session failed. Fatal for the run; teardown still
    /// executes.
    #[error("Session error: {message}")]
    Session { message: String },

    /// A scripted gesture could not be delivered. Fatal for the run, never
    /// retried.
    #[error("Gesture error: {message}")]
    Gesture { message: String },

    /// A recorder process exited non-zero. Non-fatal: the run continues
    /// with a partial or absent artifact.
    #[error("Recorder '{kind}' exited with code {exit_code}")]
    RecorderExit { kind: String, exit_code: i32 },

    /// The external merge tool failed, or an input was missing. Fatal for
    /// the merge step only; upstream artifacts are preserved.
    ///
    /// `exit_code` is `None` when the tool never ran (missing input,
    /// spawn failure).
    #[error("Merge failed (exit code {exit_code:?}): {stderr_excerpt}")]
    Merge {
        exit_code: Option<i32>,
        stderr_excerpt: String,
    },

    /// Pulling device artifacts failed. Non-fatal: logged, run continues.
    #[error("Extraction error: {message}")]
    Extraction { message: String },

    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using MobgrabError.
pub type MobgrabResult<T> = Result<T, MobgrabError>;

impl MobgrabError {
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn gesture(msg: impl Into<String>) -> Self {
        Self::Gesture {
            message: msg.into(),
        }
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction {
            message: msg.into(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
