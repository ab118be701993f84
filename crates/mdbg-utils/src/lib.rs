//! # mdbg Utilities
//!
//! Shared utilities and logging for the mdbg workspace.
//!
//! The core crate emits telemetry through `tracing` but never installs a
//! subscriber; binaries call into [`logging`] to set one up.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, LogFormat, LogLevel};
pub use tracing::{debug, error, info, trace, warn};
