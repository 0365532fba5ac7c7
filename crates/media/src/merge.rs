//! Audio/video stream merging.
//!
//! Combines one video-only and one audio-only file into a single container
//! with a fixed codec policy: video passthrough, audio re-encoded to AAC.
//! Callers must only invoke merge after both producing jobs have completed;
//! merging a still-open video file yields a truncated result. A failed
//! merge is never retried, because the command truncates its target.

use std::path::PathBuf;
use std::process::Stdio;

use mobgrab_common::error::{MobgrabError, MobgrabResult};
use tokio::process::Command;

/// Maximum stderr tail retained for diagnostics.
const STDERR_EXCERPT_LEN: usize = 512;

/// The two completed input streams and the target container path.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
    pub output_path: PathBuf,
}

/// Invokes the external transcoding tool.
pub struct MediaMerger {
    program: String,
}

impl Default for MediaMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaMerger {
    pub fn new() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }

    /// Substitute the merge binary (stub executables in tests).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Fixed codec policy: `-c:v copy -c:a aac`.
    pub fn args(request: &MergeRequest) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            request.video_path.display().to_string(),
            "-i".to_string(),
            request.audio_path.display().to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            request.output_path.display().to_string(),
        ]
    }

    /// Merge the two streams into one container file.
    ///
    /// Fails with a `Merge` error when an input is missing or the tool
    /// exits non-zero; the error carries the exit code and a stderr excerpt
    /// so the invocation can be reproduced manually.
    pub async fn merge(&self, request: &MergeRequest) -> MobgrabResult<PathBuf> {
        for input in [&request.video_path, &request.audio_path] {
            if !input.exists() {
                return Err(MobgrabError::Merge {
                    exit_code: None,
                    stderr_excerpt: format!("input file not found: {}", input.display()),
                });
            }
        }

        let args = Self::args(request);
        tracing::info!(program = %self.program, ?args, "Merging audio and video");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| MobgrabError::Merge {
                exit_code: None,
                stderr_excerpt: format!("failed to start {}: {e}", self.program),
            })?;

        if !output.status.success() {
            return Err(MobgrabError::Merge {
                exit_code: output.status.code(),
                stderr_excerpt: tail(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        tracing::info!(output = %request.output_path.display(), "Merge complete");
        Ok(request.output_path.clone())
    }
}

fn tail(s: &str) -> String {
    let trimmed = s.trim();
    match trimmed.char_indices().nth_back(STDERR_EXCERPT_LEN) {
        Some((idx, _)) => trimmed[idx..].to_string(),
        None => trimmed.to_string(),
    }
}
