//! Utility modules.

pub mod process;

pub use process::SystemCommandRunner;
