//! CLI structure and command definitions.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use secretfill_core::AppConfig;
use secretfill_types::LogLevel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "secretfill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fill in missing ExternalSecret values in Vault or Google Secret Manager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default ~/.secretfill/config.yml)
    #[arg(long, global = true, env = "SECRETFILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output; repeat for trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Where to look for ExternalSecrets and the schema.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Namespace to look for ExternalSecrets (all namespaces if omitted)
    #[arg(short = 'n', long = "ns")]
    pub namespace: Option<String>,

    /// Directory containing the GitOps repository
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}

/// How long to wait for slow-starting backends.
#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Do not wait for the backend to be ready
    #[arg(long)]
    pub no_wait: bool,

    /// Maximum time to wait for the backend (e.g. 90s, 5m, 1h)
    #[arg(short, long, default_value = "5m")]
    pub wait: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prompt for ExternalSecret values and save them to the backing store
    Edit {
        #[command(flatten)]
        source: SourceArgs,

        /// Only edit ExternalSecrets whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Populate missing ExternalSecret values from defaults and generators
    Populate {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        wait: WaitArgs,
    },

    /// Show which ExternalSecrets are populated
    Verify {
        /// Namespace to look for ExternalSecrets (all namespaces if omitted)
        #[arg(short = 'n', long = "ns")]
        namespace: Option<String>,
    },
}

impl Cli {
    /// Log level after applying `-v` and `-q`.
    pub fn log_level(&self, configured: LogLevel) -> LogLevel {
        match (self.quiet, self.verbose) {
            (true, _) => LogLevel::Error,
            (false, 0) => configured,
            (false, 1) => LogLevel::Debug,
            (false, _) => LogLevel::Trace,
        }
    }

    pub async fn execute(&self, config: &AppConfig) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Edit { source, filter, wait } => {
                edit::execute(config, source, filter.as_deref(), wait).await
            }
            Commands::Populate { source, wait } => {
                populate::execute(config, source, wait).await
            }
            Commands::Verify { namespace } => {
                verify::execute(namespace.as_deref()).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_edit_flags() {
        let cli = Cli::parse_from([
            "secretfill", "edit", "-n", "jx", "-f", "lighthouse", "--no-wait", "-v",
        ]);

        match &cli.command {
            Commands::Edit { source, filter, wait } => {
                assert_eq!(source.namespace.as_deref(), Some("jx"));
                assert_eq!(source.dir, PathBuf::from("."));
                assert_eq!(filter.as_deref(), Some("lighthouse"));
                assert!(wait.no_wait);
            }
            _ => panic!("expected edit"),
        }
        assert_eq!(cli.log_level(LogLevel::Info), LogLevel::Debug);
    }

    #[test]
    fn test_populate_defaults() {
        let cli = Cli::parse_from(["secretfill", "populate", "-q"]);

        match &cli.command {
            Commands::Populate { source, wait } => {
                assert_eq!(source.namespace, None);
                assert!(!wait.no_wait);
                assert_eq!(wait.wait, "5m");
            }
            _ => panic!("expected populate"),
        }
        assert_eq!(cli.log_level(LogLevel::Info), LogLevel::Error);
    }

    #[test]
    fn test_repeated_verbose_is_trace() {
        let cli = Cli::parse_from(["secretfill", "verify", "-vv"]);
        assert_eq!(cli.log_level(LogLevel::Warn), LogLevel::Trace);
    }
}
