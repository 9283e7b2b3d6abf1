//! # secretfill core
//!
//! Core utilities shared by the secretfill crates:
//!
//! - **Configuration**: layered application config (defaults, file, environment)
//! - **Logging**: `tracing` subscriber setup
//! - **Terminal**: colored status output
//! - **Process Execution**: the system `CommandRunner`
//! - **Time Utilities**: duration parsing for command-line flags

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod term;
pub mod time;
pub mod util;

// Re-export commonly used items
pub use config::AppConfig;
pub use secretfill_types::{SecretfillError, Result};

/// secretfill version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name, also the default log target
pub const APP_NAME: &str = "secretfill";
