//! Core trait definitions for the seams around the resolution engine.

use async_trait::async_trait;
use std::time::Duration;
use crate::command::CommandLine;
use crate::descriptor::{KeyProperties, SecretDescriptor};
use crate::errors::Result;

/// Trait for backend secret editors.
///
/// One editor exists per backend type for the whole run; it is not tied to
/// any particular ExternalSecret.
#[async_trait]
pub trait Editor: Send + Sync {
    /// Write every property of one key in a single operation.
    async fn write(&self, properties: &KeyProperties) -> Result<()>;
}

/// Trait for asking an operator for a value.
pub trait Prompter: Send + Sync {
    /// Prompt with masked input. `help` may be empty.
    fn pick_password(&self, message: &str, help: &str) -> Result<String>;
}

/// Trait for checks that a backend's runtime is reachable.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Block until ready, failing once `max_wait` has elapsed.
    async fn wait_until_ready(&self, max_wait: Duration) -> Result<()>;
}

/// Trait for running external commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command, returning trimmed stdout.
    ///
    /// A non-zero exit status is an error.
    async fn run(&self, command: &CommandLine) -> Result<String>;
}

/// Trait for reading values out of existing Kubernetes Secrets.
#[async_trait]
pub trait SecretReader: Send + Sync {
    /// Read one data entry; `None` if the Secret or entry is absent.
    async fn read_entry(&self, namespace: &str, name: &str, key: &str) -> Result<Option<String>>;
}

/// Trait for the verification step that produces descriptors.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// List descriptors, marking those with missing properties.
    async fn verify(&self, namespace: Option<&str>) -> Result<Vec<SecretDescriptor>>;
}
