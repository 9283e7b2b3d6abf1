//! Run summaries.

use colored::Colorize;
use secretfill_core::term;
use secretfill_secrets::RunReport;

pub fn print(report: &RunReport) {
    for written in &report.written {
        println!(
            "{} {} {} of {} [{}]",
            "✓".green().bold(),
            term::info("saved"),
            term::name(&written.key),
            written.secret,
            written.properties.join(", ")
        );
    }

    for skipped in &report.unsupported {
        println!(
            "{} skipped {}.{}: {} properties are not supported",
            "!".yellow().bold(),
            skipped.secret,
            skipped.property,
            skipped.kind
        );
    }

    if !report.wrote_anything() {
        println!("{}", "No values were saved".yellow());
    }
}
