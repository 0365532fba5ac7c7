//! mobgrab Common Utilities
//!
//! Shared infrastructure for all mobgrab crates:
//! - Error types and result aliases
//! - Collision-free artifact naming
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;
pub mod naming;

pub use config::*;
pub use error::*;
pub use naming::*;
