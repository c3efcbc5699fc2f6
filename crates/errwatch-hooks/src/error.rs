//! Error types for reporting, registration, and installation.

use errwatch_core::{ConfigError, SinkError};
use thiserror::Error;

/// Failure while forwarding a record to the sink.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The sink refused or failed to accept the record.
    #[error("failed to forward error record for {service}")]
    Sink {
        /// Service identity of the reporting logger.
        service: String,
        /// Underlying sink error.
        source: SinkError,
    },
}

/// Failure while mutating a [`HookRegistry`](crate::registry::HookRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry has already run its exit hooks.
    #[error("hook registry is already shut down")]
    Closed,
}

/// Failure while installing an [`ErrorLogger`](crate::registrar::ErrorLogger).
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// The supplied options were invalid.
    #[error("invalid error logger options")]
    Options {
        /// Underlying validation error.
        source: ConfigError,
    },
    /// The registry refused the registration.
    #[error("failed to register error logger")]
    Registry {
        /// Underlying registry error.
        source: RegistryError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn errors_expose_display_and_source() {
        let report = ReportError::Sink {
            service: "billing-svc".into(),
            source: SinkError::rejected("full"),
        };
        assert_eq!(
            report.to_string(),
            "failed to forward error record for billing-svc"
        );
        assert!(report.source().is_some());

        let registrar = RegistrarError::Registry {
            source: RegistryError::Closed,
        };
        assert_eq!(registrar.to_string(), "failed to register error logger");
        assert_eq!(
            registrar.source().map(ToString::to_string),
            Some("hook registry is already shut down".to_string())
        );

        let options = RegistrarError::Options {
            source: ConfigError::EmptyService,
        };
        assert!(options.source().is_some());
    }
}
