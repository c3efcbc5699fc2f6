//! Telemetry initialisation primitives and logging configuration.
//!
//! # Design
//! - Centralises logging setup (fmt or JSON) with a single entry point.
//! - Accepts one extra layer so interception layers see the same filtered
//!   event stream as the formatter.

use tracing_subscriber::layer::{Identity, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::error::{Result, TelemetryError};

/// Default logging target when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the level directive is invalid or the tracing
/// subscriber cannot be installed (for example, because another subscriber
/// has already been set globally).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    init_logging_with_layer(config, Identity::new())
}

/// Install the tracing subscriber with `layer` composed ahead of the filter
/// and formatter.
///
/// # Errors
///
/// Returns an error if the level directive is invalid or the tracing
/// subscriber cannot be installed.
pub fn init_logging_with_layer<L>(config: &LoggingConfig, layer: L) -> Result<()>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    let filter = build_env_filter(config.level)?;
    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(config.with_target)
                    .with_thread_ids(false),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(config.with_target)
                    .with_thread_ids(false),
            )
            .try_init(),
    };
    installed.map_err(|source| TelemetryError::SubscriberInstall { source })
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level string (e.g., `info`, `debug`); `RUST_LOG` takes precedence.
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
    /// Whether event targets are printed.
    pub with_target: bool,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            with_target: true,
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable logs.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Convenience helper for deriving the log format from configuration maps.
#[must_use]
pub fn log_format_from_config(config: Option<&serde_json::Value>) -> Option<LogFormat> {
    config
        .and_then(|value| value.get("log_format"))
        .and_then(|value| value.as_str())
        .map(|value| match value {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::infer(),
        })
}

fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidLevel {
        value: level.to_string(),
        source,
    })
}
