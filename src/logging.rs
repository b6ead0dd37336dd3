//! Structured logging configuration for lode.
//!
//! Provides pretty, JSON, or compact output via `tracing-subscriber`,
//! selected by server configuration. JSON output is intended for log
//! aggregation systems (Loki, Elasticsearch).

use std::io;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Logging format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty human-readable output (default for development)
    #[default]
    Pretty,
    /// JSON output for log aggregation
    Json,
    /// Compact single-line output
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format (pretty, json, compact)
    pub format: LogFormat,
    /// Minimum log level
    pub level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: Level::INFO,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Should be called once at startup. Respects the `RUST_LOG` environment
/// variable for filtering if set; otherwise falls back to the configured
/// level.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    match config.format {
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(true).with_target(true));
            let _ = tracing::subscriber::set_global_default(subscriber);
        },
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(true).with_writer(io::stdout));
            let _ = tracing::subscriber::set_global_default(subscriber);
        },
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_ansi(true).with_target(true));
            let _ = tracing::subscriber::set_global_default(subscriber);
        },
    }
}
