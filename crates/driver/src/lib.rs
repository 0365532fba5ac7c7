//! mobgrab Automation Driver
//!
//! Client side of the automation-session collaborator: a thin W3C
//! WebDriver/Appium HTTP client plus the gesture engine that scripts
//! pointer interactions against a live device session.
//!
//! The session is deliberately opaque: mobgrab issues clicks, gestures,
//! and window-size queries through [`AutomationSession`] and never
//! inspects element trees beyond waiting for a selector to appear.

pub mod client;
pub mod gesture;
pub mod session;

pub use client::WebDriverSession;
pub use gesture::{swipe, GesturePreset, GestureSpec, DEFAULT_SWIPE_MS, SCROLL_NEXT};
pub use session::{AutomationSession, WindowSize};
