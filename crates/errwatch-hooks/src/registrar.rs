//! One-time setup of an error logger on a [`HookRegistry`].
//!
//! Installing performs exactly two registrations, made under one lock: the
//! live-error interceptor is appended to the interceptor chain and the shutdown
//! finalizer to the exit hooks. A registry may carry several loggers; they compose in installation
//! order.

use std::sync::Arc;

use errwatch_core::{
    BacktraceMode, Classifier, ConfigError, ContextBuilder, DefaultClassifier, ErrorHandler,
    ErrorLoggerConfig, LogSink,
};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::RegistrarError;
use crate::finalizer::ShutdownFinalizer;
use crate::interceptor::ErrorEventInterceptor;
use crate::registry::HookRegistry;
use crate::reporter::Reporter;

/// Everything an [`ErrorLogger`] needs at construction.
pub struct ErrorLoggerOptions {
    sink: Arc<dyn LogSink>,
    service: String,
    extra_context: Map<String, Value>,
    handlers: Vec<Arc<dyn ErrorHandler>>,
    classifier: Arc<dyn Classifier>,
    backtrace: BacktraceMode,
}

impl ErrorLoggerOptions {
    /// Options for `service` forwarding to `sink`, with defaults elsewhere.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>, service: impl Into<String>) -> Self {
        Self {
            sink,
            service: service.into(),
            extra_context: Map::new(),
            handlers: Vec::new(),
            classifier: Arc::new(DefaultClassifier),
            backtrace: BacktraceMode::default(),
        }
    }

    /// Options taken from parsed configuration.
    #[must_use]
    pub fn from_config(sink: Arc<dyn LogSink>, config: &ErrorLoggerConfig) -> Self {
        Self::new(sink, config.service.clone())
            .extra_context(config.extra_context.clone())
            .backtrace(config.backtrace)
    }

    /// Replace the extra context merged into every record.
    #[must_use]
    pub fn extra_context(mut self, extra: Map<String, Value>) -> Self {
        self.extra_context = extra;
        self
    }

    /// Append a handler to the chain invoked after each live signal.
    #[must_use]
    pub fn handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Replace the severity classifier.
    #[must_use]
    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the backtrace capture policy.
    #[must_use]
    pub fn backtrace(mut self, mode: BacktraceMode) -> Self {
        self.backtrace = mode;
        self
    }
}

/// Handle to an installed error logger.
pub struct ErrorLogger {
    service: String,
    interceptor: Arc<ErrorEventInterceptor>,
    finalizer: Arc<ShutdownFinalizer>,
}

impl ErrorLogger {
    /// Install an error logger on `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service identity is blank or the registry has
    /// already shut down.
    pub fn install(
        registry: &HookRegistry,
        options: ErrorLoggerOptions,
    ) -> Result<Self, RegistrarError> {
        let ErrorLoggerOptions {
            sink,
            service,
            extra_context,
            handlers,
            classifier,
            backtrace,
        } = options;

        if service.trim().is_empty() {
            return Err(RegistrarError::Options {
                source: ConfigError::EmptyService,
            });
        }

        let reporter = Reporter::new(
            sink,
            classifier,
            ContextBuilder::new(service.clone(), extra_context),
            backtrace,
        );
        let interceptor = Arc::new(ErrorEventInterceptor::new(reporter.clone(), handlers));
        let finalizer = Arc::new(ShutdownFinalizer::new(reporter));

        registry
            .add_hooks(interceptor.clone(), finalizer.clone())
            .map_err(|source| RegistrarError::Registry { source })?;

        info!(
            target: "errwatch::registrar",
            service = %service,
            handlers = interceptor.handler_count(),
            "error logger installed"
        );

        Ok(Self {
            service,
            interceptor,
            finalizer,
        })
    }

    /// Service identity attached to every record.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The installed live-error interceptor.
    #[must_use]
    pub const fn interceptor(&self) -> &Arc<ErrorEventInterceptor> {
        &self.interceptor
    }

    /// The installed shutdown finalizer.
    #[must_use]
    pub const fn finalizer(&self) -> &Arc<ShutdownFinalizer> {
        &self.finalizer
    }
}
