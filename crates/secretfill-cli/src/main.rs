//! secretfill CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use secretfill_core::{log, AppConfig};

mod cli;
mod commands;
mod ui;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    log::init(cli.log_level(config.log.level), config.log.format)?;

    cli.execute(&config).await
}
