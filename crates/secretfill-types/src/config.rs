//! Configuration types and structures.

use serde::{Deserialize, Serialize};
use crate::LogLevel;

/// Vault connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSettings {
    /// Vault URL
    pub url: String,
    /// Vault token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// KV v2 mount point
    pub mount: String,
    /// Vault namespace (Enterprise)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Skip TLS verification
    pub insecure: bool,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            url: "https://127.0.0.1:8200".to_string(),
            token: None,
            mount: "secret".to_string(),
            namespace: None,
            insecure: false,
        }
    }
}

/// Where and how to wait for the vault pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessSettings {
    /// Namespace of the vault pod
    pub namespace: String,
    /// Vault pod name
    pub pod: String,
    /// Seconds between polls
    pub poll_interval_secs: u64,
    /// Default maximum wait, in seconds
    pub max_wait_secs: u64,
}

impl Default for ReadinessSettings {
    fn default() -> Self {
        Self {
            namespace: "vault-infra".to_string(),
            pod: "vault-0".to_string(),
            poll_interval_secs: 2,
            max_wait_secs: 300,
        }
    }
}

/// Google Cloud Secret Manager settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GsmSettings {
    /// Project to write secrets to; gcloud's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// gcloud binary
    pub gcloud: String,
}

impl Default for GsmSettings {
    fn default() -> Self {
        Self {
            project: None,
            gcloud: "gcloud".to_string(),
        }
    }
}

/// Log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Minimum level
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors
    Pretty,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}
