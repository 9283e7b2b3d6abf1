//! # secretfill types
//!
//! Core types, traits, and errors shared across all secretfill crates.
//!
//! This crate provides:
//!
//! - The ExternalSecret descriptor model (`SecretDescriptor`, `KeyProperties`)
//! - The closed set of supported backend types
//! - Traits for the seams around the engine: editors, prompts, readiness
//!   probes, command execution, Secret reads and verification
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use secretfill_types::{BackendType, SecretDescriptor};
//!
//! let d = SecretDescriptor::new("db-creds", "vault")
//!     .with_entry("creds", "password")
//!     .with_missing("creds", &["password"]);
//!
//! assert!(d.is_invalid());
//! assert_eq!(d.backend_type.parse::<BackendType>().unwrap(), BackendType::Vault);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod enums;
pub mod descriptor;
pub mod command;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{SecretfillError, Result};
pub use enums::{BackendType, LogLevel};
pub use descriptor::{
    DeclaredEntry, EntryDeficiency, KeyProperties, PropertyValue, ResolutionError, SecretDescriptor,
};
pub use command::CommandLine;
pub use traits::{CommandRunner, Editor, Prompter, ReadinessProbe, SecretReader, Verifier};
