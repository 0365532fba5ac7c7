//! Scripted pointer gestures.
//!
//! A gesture is one press-drag-release delivered to the session as a single
//! atomic W3C action sequence. Partial delivery (press without release) is
//! impossible by construction: the press and release live in the same
//! payload. Failed gestures surface to the caller and are never retried.

use mobgrab_common::error::{MobgrabError, MobgrabResult};

use crate::session::{AutomationSession, WindowSize};

/// Default drag duration in milliseconds.
pub const DEFAULT_SWIPE_MS: u64 = 300;

/// A pointer path expressed as window-size fractions.
#[derive(Debug, Clone, Copy)]
pub struct GesturePreset {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

/// Swipe up along the left edge: load the next feed item.
pub const SCROLL_NEXT: GesturePreset = GesturePreset {
    start_x: 0.3,
    start_y: 0.8,
    end_x: 0.3,
    end_y: 0.2,
};

/// One concrete pointer path in absolute pixels.
///
/// Always built from fractions against the live window size so the same
/// script works across device resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSpec {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
    pub duration_ms: u64,
}

impl GestureSpec {
    /// Resolve a fractional preset against the given window size.
    ///
    /// Coordinates are clamped into `[0, W] x [0, H]`.
    pub fn from_fractions(window: WindowSize, preset: GesturePreset, duration_ms: u64) -> Self {
        let scale = |fraction: f64, max: u32| -> u32 {
            let value = (fraction * max as f64).round();
            value.clamp(0.0, max as f64) as u32
        };
        Self {
            start_x: scale(preset.start_x, window.width),
            start_y: scale(preset.start_y, window.height),
            end_x: scale(preset.end_x, window.width),
            end_y: scale(preset.end_y, window.height),
            duration_ms,
        }
    }
}

/// Build the W3C pointer input source for one swipe: instantaneous move to
/// the start point, press, timed move to the end point, release.
pub fn pointer_sequence(spec: &GestureSpec) -> serde_json::Value {
    serde_json::json!({
        "type": "pointer",
        "id": "finger1",
        "parameters": { "pointerType": "touch" },
        "actions": [
            { "type": "pointerMove", "duration": 0, "x": spec.start_x, "y": spec.start_y },
            { "type": "pointerDown", "button": 0 },
            { "type": "pointerMove", "duration": spec.duration_ms, "x": spec.end_x, "y": spec.end_y },
            { "type": "pointerUp", "button": 0 },
        ],
    })
}

/// Issue one swipe against the session, then explicitly release the virtual
/// pointer.
pub async fn swipe<S: AutomationSession + ?Sized>(
    session: &S,
    spec: &GestureSpec,
) -> MobgrabResult<()> {
    tracing::debug!(?spec, "Performing swipe");

    let payload = serde_json::json!({ "actions": [pointer_sequence(spec)] });
    session
        .perform_actions(payload)
        .await
        .map_err(|e| MobgrabError::gesture(format!("swipe delivery failed: {e}")))?;
    session
        .release_actions()
        .await
        .map_err(|e| MobgrabError::gesture(format!("pointer release failed: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn press_release_indices(sequence: &serde_json::Value) -> (Vec<usize>, Vec<usize>) {
        let actions = sequence["actions"].as_array().unwrap();
        let positions = |kind: &str| -> Vec<usize> {
            actions
                .iter()
                .enumerate()
                .filter(|(_, a)| a["type"] == kind)
                .map(|(i, _)| i)
                .collect()
        };
        (positions("pointerDown"), positions("pointerUp"))
    }

    #[test]
    fn test_exactly_one_press_and_release_in_order() {
        let spec = GestureSpec {
            start_x: 324,
            start_y: 1920,
            end_x: 324,
            end_y: 480,
            duration_ms: DEFAULT_SWIPE_MS,
        };
        let sequence = pointer_sequence(&spec);
        let (downs, ups) = press_release_indices(&sequence);
        assert_eq!(downs.len(), 1);
        assert_eq!(ups.len(), 1);
        assert!(downs[0] < ups[0]);
    }

    #[test]
    fn test_zero_duration_still_presses_and_releases() {
        let spec = GestureSpec {
            start_x: 10,
            start_y: 10,
            end_x: 20,
            end_y: 20,
            duration_ms: 0,
        };
        let sequence = pointer_sequence(&spec);
        let (downs, ups) = press_release_indices(&sequence);
        assert_eq!(downs.len(), 1);
        assert_eq!(ups.len(), 1);
        assert!(downs[0] < ups[0]);
        // The drag move carries the requested duration verbatim.
        assert_eq!(sequence["actions"][2]["duration"], 0);
    }

    #[test]
    fn test_scroll_next_resolves_against_window() {
        let window = WindowSize {
            width: 1080,
            height: 2400,
        };
        let spec = GestureSpec::from_fractions(window, SCROLL_NEXT, DEFAULT_SWIPE_MS);
        assert_eq!(spec.start_x, 324);
        assert_eq!(spec.start_y, 1920);
        assert_eq!(spec.end_x, 324);
        assert_eq!(spec.end_y, 480);
    }

    proptest! {
        #[test]
        fn prop_fraction_presets_stay_in_bounds(
            width in 1u32..8192,
            height in 1u32..8192,
            sx in 0.2f64..=0.8,
            sy in 0.2f64..=0.8,
            ex in 0.2f64..=0.8,
            ey in 0.2f64..=0.8,
        ) {
            let window = WindowSize { width, height };
            let preset = GesturePreset { start_x: sx, start_y: sy, end_x: ex, end_y: ey };
            let spec = GestureSpec::from_fractions(window, preset, DEFAULT_SWIPE_MS);
            prop_assert!(spec.start_x <= width);
            prop_assert!(spec.end_x <= width);
            prop_assert!(spec.start_y <= height);
            prop_assert!(spec.end_y <= height);
        }
    }
}
