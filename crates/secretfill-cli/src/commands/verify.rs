//! ExternalSecret verification report.

use super::verify_descriptors;
use anyhow::Result;
use colored::Colorize;
use secretfill_core::term;
use secretfill_services::connect;

pub async fn execute(namespace: Option<&str>) -> Result<()> {
    let client = connect().await?;
    let descriptors = verify_descriptors(client, namespace).await?;

    if descriptors.is_empty() {
        println!("{} No ExternalSecrets found", "✓".green().bold());
        return Ok(());
    }

    let mut missing = 0;
    for d in &descriptors {
        let ok = !d.is_invalid();
        let location = if d.namespace.is_empty() {
            d.name.clone()
        } else {
            format!("{}/{}", d.namespace, d.name)
        };
        println!("{} {} ({})", term::status_mark(ok), term::name(&location), d.backend_type);

        if let Some(error) = d.error.as_ref().filter(|_| !ok) {
            missing += 1;
            for entry in &error.entries {
                println!("    {} {} [{}]", term::warn("missing"), entry.key, entry.properties.join(", "));
            }
        }
    }

    println!();
    if missing == 0 {
        println!("{} the {} ExternalSecrets are populated", "✓".green().bold(), descriptors.len());
    } else {
        println!(
            "{} {} of {} ExternalSecrets have missing values",
            "✗".red().bold(),
            missing,
            descriptors.len()
        );
    }
    Ok(())
}
