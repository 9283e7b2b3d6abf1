//! Logging system for secretfill.

use secretfill_types::{SecretfillError, LogLevel, Result};
use secretfill_types::config::LogFormat;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the default filter directive for `level`.
///
/// Targets are prefix-matched, so this covers every `secretfill_*` crate;
/// everything else stays at `warn`.
pub fn filter_directive(level: LogLevel) -> String {
    format!("warn,{}={}", crate::APP_NAME, level.as_filter())
}

/// Initialize the global subscriber.
///
/// `RUST_LOG`, when set, replaces the computed filter.
pub fn init(level: LogLevel, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| SecretfillError::Config(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let directive = filter_directive(LogLevel::Debug);
        assert_eq!(directive, "warn,secretfill=debug");
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
