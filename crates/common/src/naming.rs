//! Collision-free output file naming.
//!
//! Every artifact a run produces is named `<prefix>_<unixTimeMillis>.<ext>`.
//! The millisecond stamp makes names unique across runs; within a run a
//! process-wide monotonic sequence breaks ties when two names are requested
//! inside the same millisecond (or when the wall clock steps backwards), so
//! an output path can never silently overwrite an earlier one.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

static LAST_ISSUED: Mutex<(i64, u32)> = Mutex::new((0, 0));

/// Generate a unique artifact file name for the given prefix and extension.
pub fn artifact_name(prefix: &str, ext: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_ISSUED.lock().unwrap_or_else(|e| e.into_inner());
    if millis > last.0 {
        *last = (millis, 0);
        format!("{prefix}_{millis}.{ext}")
    } else {
        // Same millisecond as the previous name, or a clock step backwards:
        // stay on the last stamp and bump the sequence.
        last.1 += 1;
        format!("{prefix}_{stamp}-{seq}.{ext}", stamp = last.0, seq = last.1)
    }
}

/// Generate a unique artifact path inside `dir`.
pub fn artifact_path(dir: &Path, prefix: &str, ext: &str) -> PathBuf {
    dir.join(artifact_name(prefix, ext))
}
