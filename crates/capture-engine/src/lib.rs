//! mobgrab Capture Engine
//!
//! Runs out-of-process audio/video recorders against a fixed duration
//! budget and collects their termination results.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               CaptureSession                 │
//! │  ┌───────────────┐   ┌────────────────────┐  │
//! │  │ ProcessHandle │   │ ProcessHandle      │  │
//! │  │ scrcpy (video)│   │ sndcpy/ffmpeg (aud)│  │
//! │  └───────┬───────┘   └─────────┬──────────┘  │
//! │          │ SIGINT at budget    │ self-stops  │
//! │          ▼                     ▼             │
//! │    screen_<ts>.mp4       audio_<ts>.wav      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The recorders run in the background OS process table; the single control
//! thread only ever suspends on their completion. A hard upper bound of
//! duration + grace guarantees `await_completion` never blocks forever.

pub mod process;
pub mod recorders;
pub mod session;

pub use process::{ProcessHandle, ProcessOutcome};
pub use recorders::{JobKind, JobSpec};
pub use session::{CaptureSession, JobResult, JobStatus, DEFAULT_GRACE};
