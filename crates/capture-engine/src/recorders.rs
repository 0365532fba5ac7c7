//! Recorder invocation presets.
//!
//! Two kinds of recorder exist in the wild: duration-bounded audio tools
//! that terminate on their own, and unbounded screen recorders that must be
//! interrupted externally. Each preset derives a fresh time-stamped output
//! path, so no two jobs ever share a file.

use std::fmt;
use std::path::{Path, PathBuf};

use mobgrab_common::naming;

/// What a capture job records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Video,
    Audio,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Video => write!(f, "video"),
            JobKind::Audio => write!(f, "audio"),
        }
    }
}

/// Declarative description of one recorder invocation.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub kind: JobKind,
    pub program: String,
    pub args: Vec<String>,

    /// Where the recorder writes its stream. Computed once at spec
    /// creation and never reused.
    pub output_path: PathBuf,

    /// Whether the recorder exits on its own once its duration elapses.
    /// Screen recorders do not; they are interrupted at the budget.
    pub self_terminating: bool,
}

impl JobSpec {
    /// Substitute the recorder binary (stub executables in tests).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

/// Screen capture via scrcpy. Unbounded: records until interrupted.
pub fn screen_recorder(output_dir: &Path, prefix: &str) -> JobSpec {
    let output_path = naming::artifact_path(output_dir, &format!("{prefix}_video"), "mp4");
    JobSpec {
        kind: JobKind::Video,
        program: "scrcpy".to_string(),
        args: vec![
            "--no-playback".to_string(),
            "--record".to_string(),
            output_path.display().to_string(),
        ],
        output_path,
        self_terminating: false,
    }
}

/// Device audio capture via sndcpy. Self-terminates after `duration_secs`.
pub fn device_audio_recorder(output_dir: &Path, prefix: &str, duration_secs: u64) -> JobSpec {
    let output_path = naming::artifact_path(output_dir, &format!("{prefix}_audio"), "wav");
    JobSpec {
        kind: JobKind::Audio,
        program: "sndcpy".to_string(),
        args: vec![
            "--output".to_string(),
            output_path.display().to_string(),
            "--time".to_string(),
            duration_secs.to_string(),
        ],
        output_path,
        self_terminating: true,
    }
}

/// Host audio-input capture via ffmpeg. Self-terminates after
/// `duration_secs` through the `-t` flag.
pub fn host_audio_recorder(
    output_dir: &Path,
    prefix: &str,
    device: &str,
    duration_secs: u64,
) -> JobSpec {
    let output_path = naming::artifact_path(output_dir, &format!("{prefix}_audio"), "mp3");
    let (input_format, input) = if cfg!(windows) {
        ("dshow", format!("audio={device}"))
    } else {
        ("pulse", device.to_string())
    };
    JobSpec {
        kind: JobKind::Audio,
        program: "ffmpeg".to_string(),
        args: vec![
            "-f".to_string(),
            input_format.to_string(),
            "-i".to_string(),
            input,
            "-ac".to_string(),
            "2".to_string(),
            "-ar".to_string(),
            "44100".to_string(),
            "-t".to_string(),
            duration_secs.to_string(),
            "-y".to_string(),
            output_path.display().to_string(),
        ],
        output_path,
        self_terminating: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_recorder_is_unbounded() {
        let spec = screen_recorder(Path::new("/tmp"), "clip");
        assert_eq!(spec.kind, JobKind::Video);
        assert!(!spec.self_terminating);
        assert_eq!(spec.program, "scrcpy");
        assert!(spec.args.contains(&"--record".to_string()));
        assert_eq!(spec.output_path.extension().and_then(|e| e.to_str()), Some("mp4"));
    }

    #[test]
    fn test_device_audio_recorder_carries_duration() {
        let spec = device_audio_recorder(Path::new("/tmp"), "clip", 10);
        assert_eq!(spec.kind, JobKind::Audio);
        assert!(spec.self_terminating);
        let time_pos = spec.args.iter().position(|a| a == "--time").unwrap();
        assert_eq!(spec.args[time_pos + 1], "10");
    }

    #[test]
    fn test_host_audio_recorder_fixed_sampling() {
        let spec = host_audio_recorder(Path::new("/tmp"), "clip", "default", 8);
        assert!(spec.self_terminating);
        assert_eq!(spec.program, "ffmpeg");
        let t_pos = spec.args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(spec.args[t_pos + 1], "8");
        assert!(spec.args.contains(&"44100".to_string()));
    }

    #[test]
    fn test_specs_never_share_output_paths() {
        let a = screen_recorder(Path::new("/tmp"), "clip");
        let b = screen_recorder(Path::new("/tmp"), "clip");
        assert_ne!(a.output_path, b.output_path);
    }
}
