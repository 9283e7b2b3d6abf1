//! CLI command implementations.

pub mod edit;
pub mod populate;
pub mod verify;

use crate::cli::{SourceArgs, WaitArgs};
use crate::ui::progress::SpinnerProbe;
use anyhow::{Context, Result};
use secretfill_core::time::parse_duration;
use secretfill_core::util::SystemCommandRunner;
use secretfill_core::AppConfig;
use secretfill_secrets::{BackendEditorFactory, EditorCache, ReadinessGate, Schema, WaitPolicy};
use secretfill_services::{ExternalSecretVerifier, VaultPodProbe};
use secretfill_types::{SecretDescriptor, Verifier};
use std::sync::Arc;
use tracing::info;

/// List ExternalSecrets with their missing entries.
pub async fn verify_descriptors(client: kube::Client, namespace: Option<&str>) -> Result<Vec<SecretDescriptor>> {
    ExternalSecretVerifier::new(client)
        .verify(namespace)
        .await
        .context("failed to verify ExternalSecrets")
}

/// Log and return true when nothing is missing.
pub fn all_populated(descriptors: &[SecretDescriptor]) -> bool {
    if descriptors.iter().any(SecretDescriptor::is_invalid) {
        return false;
    }
    info!("the {} ExternalSecrets are populated", descriptors.len());
    true
}

/// Load the schema from the GitOps directory.
pub fn load_schema(config: &AppConfig, source: &SourceArgs) -> Result<Arc<Schema>> {
    let path = config.schema_path(&source.dir);
    let schema = Schema::load(&path)?;
    Ok(Arc::new(schema))
}

/// Readiness gate for the vault pod.
pub fn readiness_gate(config: &AppConfig, client: kube::Client, wait: &WaitArgs) -> Result<ReadinessGate> {
    let policy = if wait.no_wait {
        WaitPolicy::Disabled
    } else {
        WaitPolicy::UpTo(parse_duration(&wait.wait).context("invalid --wait")?)
    };

    let probe = VaultPodProbe::new(client, &config.readiness.namespace, &config.readiness.pod)
        .with_poll_interval(config.poll_interval());

    Ok(ReadinessGate::new(Arc::new(SpinnerProbe::new(probe)), policy))
}

/// Editor cache over the real backends.
pub fn editor_cache(config: &AppConfig) -> EditorCache {
    let factory = BackendEditorFactory::new(
        config.vault.clone(),
        config.gsm.clone(),
        Arc::new(SystemCommandRunner::new()),
    );
    EditorCache::new(Arc::new(factory))
}
