//! Typed options for an error logger instance.
//!
//! # Design
//! - Options arrive as an already-parsed JSON value; reading files or the
//!   environment is left to the embedding application.
//! - Every field except `service` has a default so minimal payloads stay small.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::severity::SeverityTier;

/// How eagerly stack snapshots are taken at interception time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacktraceMode {
    /// Never capture; records carry the placeholder.
    Disabled,
    /// Capture when `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE` enable it.
    #[default]
    Capture,
    /// Always capture regardless of environment.
    Force,
}

/// Lowest `tracing` level turned into an error signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureLevel {
    /// Capture info, warn, and error events.
    Info,
    /// Capture warn and error events.
    #[default]
    Warn,
    /// Capture error events only.
    Error,
}

impl CaptureLevel {
    /// Lowest severity tier admitted at this level.
    #[must_use]
    pub const fn min_tier(self) -> SeverityTier {
        match self {
            Self::Info => SeverityTier::Notice,
            Self::Warn => SeverityTier::Warning,
            Self::Error => SeverityTier::Error,
        }
    }
}

/// Options describing one error logger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLoggerConfig {
    /// Service identity attached to every record.
    pub service: String,
    /// Extra fields merged into every record, overriding base fields.
    #[serde(default)]
    pub extra_context: Map<String, Value>,
    /// Backtrace capture policy.
    #[serde(default)]
    pub backtrace: BacktraceMode,
    /// Lowest `tracing` level intercepted by the signal layer.
    #[serde(default)]
    pub capture_level: CaptureLevel,
}

impl ErrorLoggerConfig {
    /// Options for `service` with every other field defaulted.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            extra_context: Map::new(),
            backtrace: BacktraceMode::default(),
            capture_level: CaptureLevel::default(),
        }
    }

    /// Parse options from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload has the wrong shape or names an empty
    /// service identity.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let config = Self::deserialize(value).map_err(|source| ConfigError::Invalid { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyService`] when the service identity is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.trim().is_empty() {
            return Err(ConfigError::EmptyService);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_payload_uses_defaults() {
        let config = ErrorLoggerConfig::from_value(&json!({"service": "billing-svc"}))
            .expect("valid options");
        assert_eq!(config, ErrorLoggerConfig::new("billing-svc"));
        assert_eq!(config.backtrace, BacktraceMode::Capture);
        assert_eq!(config.capture_level, CaptureLevel::Warn);
    }

    #[test]
    fn full_payload_parses_every_field() {
        let config = ErrorLoggerConfig::from_value(&json!({
            "service": "billing-svc@live",
            "extra_context": {"region": "eu-west-1"},
            "backtrace": "force",
            "capture_level": "info",
        }))
        .expect("valid options");
        assert_eq!(config.extra_context.get("region"), Some(&json!("eu-west-1")));
        assert_eq!(config.backtrace, BacktraceMode::Force);
        assert_eq!(config.capture_level.min_tier(), SeverityTier::Notice);
    }

    #[test]
    fn blank_service_is_rejected() {
        let err = ErrorLoggerConfig::from_value(&json!({"service": "  "}))
            .expect_err("blank service");
        assert!(matches!(err, ConfigError::EmptyService));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = ErrorLoggerConfig::from_value(&json!({"service": "svc", "backtrace": "sometimes"}))
            .expect_err("bad backtrace mode");
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
