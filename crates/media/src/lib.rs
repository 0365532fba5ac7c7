//! mobgrab Media Tools
//!
//! Post-capture plumbing around external tools: merging independently
//! recorded audio/video streams into one container (ffmpeg) and pulling
//! device-resident artifacts to local storage (adb).

pub mod extract;
pub mod merge;

pub use extract::ArtifactExtractor;
pub use merge::{MediaMerger, MergeRequest};
