//! Interactive editing of ExternalSecret values.

use super::{all_populated, editor_cache, load_schema, readiness_gate, verify_descriptors};
use crate::cli::{SourceArgs, WaitArgs};
use crate::ui::prompt::TerminalPrompter;
use crate::ui::report;
use anyhow::{bail, Result};
use secretfill_core::{term, AppConfig};
use secretfill_secrets::SecretPlan;
use secretfill_services::connect;
use std::sync::Arc;

pub async fn execute(
    config: &AppConfig,
    source: &SourceArgs,
    filter: Option<&str>,
    wait: &WaitArgs,
) -> Result<()> {
    let client = connect().await?;
    let descriptors = verify_descriptors(client.clone(), source.namespace.as_deref()).await?;

    let filter = filter.filter(|f| !f.is_empty());
    if filter.is_none() && all_populated(&descriptors) {
        return Ok(());
    }

    if !term::in_controlling_terminal() {
        bail!("edit prompts for values and needs an interactive terminal; use populate instead");
    }

    let schema = load_schema(config, source)?;
    let gate = readiness_gate(config, client, wait)?;

    let mut plan = SecretPlan::edit(
        filter.map(String::from),
        schema,
        Arc::new(TerminalPrompter::new()),
        gate,
        editor_cache(config),
    );
    let report = plan.run(&descriptors).await?;

    report::print(&report);
    Ok(())
}
