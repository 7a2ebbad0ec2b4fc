//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so the report on stdout stays machine-readable when
//! `--output json` is used.
//!
//! - `warn`: missing or unreadable files (default)
//! - `info`: per-database and per-table progress (`-v`)
//! - `debug`: defects as they are found, boundary row dumps (`-vv`)
//! - `trace`: skipped rules (`-vvv`)

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::CliError;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
}

impl LogConfig {
    /// - 0: warn, 1: info, 2: debug, 3+: trace
    pub fn from_verbosity(verbosity: u8, format: LogFormat) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self { level, format }
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> Result<(), CliError> {
    let filter = build_env_filter(config.level);
    let registry = tracing_subscriber::registry().with(filter);

    let res = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .without_time()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };
    res.map_err(|e| CliError::Logging(e.to_string()))
}

/// `RUST_LOG` wins over the verbosity flag when set.
fn build_env_filter(level: Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // External crates stay at warn
        EnvFilter::new(format!(
            "warn,dumpguard_core={level},dumpguard_cli={level},dumpguard={level}"
        ))
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0, LogFormat::Pretty).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1, LogFormat::Pretty).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2, LogFormat::Pretty).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(9, LogFormat::Json).level, Level::TRACE);
    }
}
