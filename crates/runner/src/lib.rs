//! mobgrab Runner
//!
//! The orchestrator: one strictly sequential state machine that drives a
//! whole run. It opens the session, starts recorders, overlaps gestures and
//! in-app actions with the recording window, awaits recorder completion,
//! then merges and extracts. The four historical capture scripts are presets
//! over a single [`RunPlan`].

pub mod orchestrator;
pub mod plan;

pub use orchestrator::{merge_output_path, Orchestrator, RunReport, RunState};
pub use plan::{DownloadStep, ExtractStep, RunPlan};
