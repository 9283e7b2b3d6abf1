//! Common enumerations used throughout secretfill.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{SecretfillError, Result};

/// The external secret stores an ExternalSecret can be backed by.
///
/// This is a closed set: every variant has exactly one editor, and an
/// unrecognized `backendType` string is rejected rather than defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendType {
    /// HashiCorp Vault (KV v2)
    #[serde(rename = "vault")]
    Vault,
    /// Google Cloud Secret Manager
    #[serde(rename = "gcpSecretsManager")]
    GcpSecretsManager,
}

impl BackendType {
    /// The `backendType` tag as written on ExternalSecret resources.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Vault => "vault",
            BackendType::GcpSecretsManager => "gcpSecretsManager",
        }
    }

    /// Whether writes must wait for the backend's in-cluster runtime first.
    pub fn is_slow_starting(&self) -> bool {
        match self {
            BackendType::Vault => true,
            BackendType::GcpSecretsManager => false,
        }
    }
}

impl FromStr for BackendType {
    type Err = SecretfillError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vault" => Ok(BackendType::Vault),
            "gcpSecretsManager" => Ok(BackendType::GcpSecretsManager),
            _ => Err(SecretfillError::UnsupportedBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log level enumeration for the logging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Detailed trace messages
    Trace,
}

impl LogLevel {
    /// The directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = SecretfillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(SecretfillError::Config(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}
