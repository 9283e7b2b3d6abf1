//! Automatic population of missing ExternalSecret values.

use super::{all_populated, editor_cache, load_schema, readiness_gate, verify_descriptors};
use crate::cli::{SourceArgs, WaitArgs};
use crate::ui::report;
use anyhow::Result;
use secretfill_core::AppConfig;
use secretfill_secrets::{GeneratorRegistry, SecretPlan};
use secretfill_services::{connect, KubeSecretReader};
use std::sync::Arc;
use tracing::warn;

pub async fn execute(config: &AppConfig, source: &SourceArgs, wait: &WaitArgs) -> Result<()> {
    let client = connect().await?;
    let namespace = source.namespace.as_deref();
    let descriptors = verify_descriptors(client.clone(), namespace).await?;

    if all_populated(&descriptors) {
        return Ok(());
    }

    let schema = load_schema(config, source)?;
    let generators = GeneratorRegistry::standard(
        Arc::new(KubeSecretReader::new(client.clone())),
        namespace.unwrap_or(&config.boot_namespace),
        &config.boot_secret,
    );
    let gate = readiness_gate(config, client.clone(), wait)?;

    let mut plan = SecretPlan::populate(schema, generators, gate, editor_cache(config));
    let report = plan.run(&descriptors).await?;
    report::print(&report);

    let remaining = verify_descriptors(client, namespace).await?;
    if !all_populated(&remaining) {
        let missing = remaining.iter().filter(|d| d.is_invalid()).count();
        warn!("{} ExternalSecrets still have missing values; run edit to fill them in", missing);
    }
    Ok(())
}
