//! Configuration management for secretfill.
//!
//! ## Configuration Layers
//!
//! Values are resolved in this priority order:
//! 1. Environment variables
//! 2. Values loaded from file
//! 3. Default values
//!
//! ## Example
//!
//! ```no_run
//! use secretfill_core::config::AppConfig;
//!
//! let config = AppConfig::load(None)?;
//! let schema = config.schema_path(std::path::Path::new("."));
//! # Ok::<(), secretfill_core::SecretfillError>(())
//! ```

use secretfill_types::{SecretfillError, Result, LogLevel};
use secretfill_types::config::{GsmSettings, LogSettings, ReadinessSettings, VaultSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::fs;
use std::time::Duration;

/// Application configuration (~/.secretfill/config.yml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Vault connection
    pub vault: VaultSettings,
    /// Vault pod readiness
    pub readiness: ReadinessSettings,
    /// Google Cloud Secret Manager
    pub gsm: GsmSettings,
    /// Schema file, relative to the working directory
    pub schema_file: PathBuf,
    /// Kubernetes Secret read by the git operator generators
    pub boot_secret: String,
    /// Namespace of `boot_secret` when no namespace is given on the command line
    pub boot_namespace: String,
    /// Logging
    pub log: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            vault: VaultSettings::default(),
            readiness: ReadinessSettings::default(),
            gsm: GsmSettings::default(),
            schema_file: PathBuf::from(".jx").join("gitops").join("secret-schema.yaml"),
            boot_secret: "jx-boot".to_string(),
            boot_namespace: "jx".to_string(),
            log: LogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, then apply environment overrides.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used if present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(path)?,
                _ => Self::default(),
            },
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific file, without environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SecretfillError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .map_err(|e| SecretfillError::Config(format!("Failed to parse config {}: {}", path.display(), e)))
    }

    /// Get the default path for the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".secretfill").join("config.yml"))
    }

    /// Apply the environment layer using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(url) = lookup("VAULT_ADDR") {
            self.vault.url = url;
        }
        if let Some(token) = lookup("VAULT_TOKEN") {
            self.vault.token = Some(token);
        }
        if let Some(ns) = lookup("VAULT_NAMESPACE") {
            self.vault.namespace = Some(ns);
        }
        if let Some(skip) = lookup("VAULT_SKIP_VERIFY") {
            self.vault.insecure = matches!(skip.as_str(), "1" | "true" | "TRUE" | "yes");
        }
        if let Some(project) = lookup("GOOGLE_CLOUD_PROJECT") {
            self.gsm.project = Some(project);
        }
        if let Some(level) = lookup("SECRETFILL_LOG").and_then(|l| l.parse::<LogLevel>().ok()) {
            self.log.level = level;
        }
    }

    /// Full path of the schema file under `dir`.
    pub fn schema_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.schema_file)
    }

    /// Interval between vault pod readiness polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.readiness.poll_interval_secs.max(1))
    }
}
