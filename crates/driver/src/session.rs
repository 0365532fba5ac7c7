//! The automation-session abstraction.

use std::time::Duration;

use async_trait::async_trait;
use mobgrab_common::error::MobgrabResult;

/// Window dimensions negotiated with the live session.
///
/// Gesture coordinates are always derived from these per invocation, never
/// hardcoded, so scripts stay device-resolution-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// A live, stateful connection to a running mobile application instance.
///
/// Implemented by [`crate::WebDriverSession`] for real devices and by
/// scripted stubs in tests. All methods suspend the single control thread;
/// there is no concurrent access to a session within a run.
#[async_trait]
pub trait AutomationSession: Send + Sync {
    /// Deliver one atomic action sequence (W3C `performActions` payload).
    async fn perform_actions(&self, actions: serde_json::Value) -> MobgrabResult<()>;

    /// Release all virtual input sources held by the session.
    async fn release_actions(&self) -> MobgrabResult<()>;

    /// Query the current window dimensions.
    async fn window_size(&self) -> MobgrabResult<WindowSize>;

    /// Suspend the control flow for the given duration.
    async fn pause(&self, duration: Duration) -> MobgrabResult<()>;

    /// Wait until an element matching `selector` is present, then click it.
    async fn wait_and_click(&self, selector: &str, timeout: Duration) -> MobgrabResult<()>;

    /// Tear down the remote session.
    async fn delete_session(&self) -> MobgrabResult<()>;
}
