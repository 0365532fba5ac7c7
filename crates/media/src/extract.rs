//! Device artifact extraction.
//!
//! One bulk pull from the device filesystem to a local directory via the
//! adb transport. A failed extraction never invalidates an otherwise
//! successful capture; the orchestrator logs it and moves on.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use mobgrab_common::error::{MobgrabError, MobgrabResult};
use tokio::process::Command;

/// Pulls files from the remote device filesystem.
pub struct ArtifactExtractor {
    program: String,
}

impl Default for ArtifactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactExtractor {
    pub fn new() -> Self {
        Self {
            program: "adb".to_string(),
        }
    }

    /// Substitute the transport binary (stub executables in tests).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Pull everything under `remote_path` into `local_dir`, returning the
    /// paths copied in this invocation (pre-existing files are excluded).
    pub async fn extract(&self, remote_path: &str, local_dir: &Path) -> MobgrabResult<Vec<PathBuf>> {
        std::fs::create_dir_all(local_dir).map_err(|e| {
            MobgrabError::extraction(format!(
                "cannot create local dir {}: {e}",
                local_dir.display()
            ))
        })?;

        let before = list_files(local_dir)?;

        tracing::info!(program = %self.program, remote_path, local_dir = %local_dir.display(), "Pulling device artifacts");

        let output = Command::new(&self.program)
            .arg("pull")
            .arg(remote_path)
            .arg(local_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                MobgrabError::extraction(format!("failed to start {}: {e}", self.program))
            })?;

        if !output.status.success() {
            return Err(MobgrabError::extraction(format!(
                "{} pull exited with {:?}: {}",
                self.program,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let after = list_files(local_dir)?;
        let mut copied: Vec<PathBuf> = after.difference(&before).cloned().collect();
        copied.sort();

        tracing::info!(count = copied.len(), "Artifacts extracted");
        Ok(copied)
    }
}

/// All regular files under `dir`, recursively.
fn list_files(dir: &Path) -> MobgrabResult<HashSet<PathBuf>> {
    let mut files = HashSet::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current).map_err(|e| {
            MobgrabError::extraction(format!("cannot read {}: {e}", current.display()))
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| {
                MobgrabError::extraction(format!("cannot read {}: {e}", current.display()))
            })?;
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.insert(path);
            }
        }
    }
    Ok(files)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use mobgrab_common::naming;
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable stub standing in for `adb`.
    fn stub_transport(body: &str) -> PathBuf {
        let path = naming::artifact_path(&std::env::temp_dir(), "stub_adb", "sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn temp_dir(prefix: &str) -> PathBuf {
        let dir = naming::artifact_path(&std::env::temp_dir(), prefix, "d");
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_extract_lists_copied_files() {
        // Stub adb: `pull <remote> <local>` becomes a plain copy.
        let stub = stub_transport(r#"cp "$2" "$3""#);
        let remote = naming::artifact_path(&std::env::temp_dir(), "remote_clip", "mp4");
        std::fs::write(&remote, b"media").unwrap();
        let local = temp_dir("extract_ok");

        let extractor = ArtifactExtractor::with_program(stub.display().to_string());
        let copied = extractor
            .extract(&remote.display().to_string(), &local)
            .await
            .unwrap();

        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].file_name(), remote.file_name());
    }

    #[tokio::test]
    async fn test_preexisting_files_not_reported() {
        let stub = stub_transport(r#"cp "$2" "$3""#);
        let remote = naming::artifact_path(&std::env::temp_dir(), "remote_clip2", "mp4");
        std::fs::write(&remote, b"media").unwrap();
        let local = temp_dir("extract_pre");
        std::fs::write(local.join("already_here.mp4"), b"old").unwrap();

        let extractor = ArtifactExtractor::with_program(stub.display().to_string());
        let copied = extractor
            .extract(&remote.display().to_string(), &local)
            .await
            .unwrap();

        assert_eq!(copied.len(), 1);
        assert_ne!(copied[0].file_name().unwrap(), "already_here.mp4");
    }

    #[tokio::test]
    async fn test_transport_failure_is_extraction_error() {
        let stub = stub_transport("echo 'error: device not found' >&2; exit 1");
        let local = temp_dir("extract_fail");

        let extractor = ArtifactExtractor::with_program(stub.display().to_string());
        let result = extractor.extract("/sdcard/DCIM/Camera", &local).await;

        match result {
            Err(MobgrabError::Extraction { message }) => {
                assert!(message.contains("device not found"));
            }
            other => panic!("expected Extraction error, got {other:?}"),
        }
    }
}
