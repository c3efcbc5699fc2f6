//! Error types for sinks and option parsing.

use thiserror::Error;

/// Failure reported by a [`LogSink`](crate::sink::LogSink).
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink could not accept the record.
    #[error("log sink rejected record")]
    Rejected {
        /// Sink-specific explanation.
        reason: String,
    },
    /// The sink failed while writing the record.
    #[error("log sink write failed")]
    Io {
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The sink failed to serialise the record.
    #[error("log sink could not serialise record")]
    Serialize {
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

impl SinkError {
    /// Build a [`SinkError::Rejected`] from any displayable reason.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Failure raised while parsing [`ErrorLoggerConfig`](crate::config::ErrorLoggerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options payload did not match the expected shape.
    #[error("invalid error logger options")]
    Invalid {
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// The service identity was blank.
    #[error("service identity must not be empty")]
    EmptyService,
}
