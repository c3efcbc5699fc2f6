//! Shared classify, enrich, and forward path used by both the live and the
//! fatal reporting hooks.

use std::sync::Arc;

use errwatch_core::{
    BacktraceMode, CapturedBacktrace, Classifier, ContextBuilder, ErrorSignal, LastError,
    LogContext, LogSink, SeverityTier,
};

use crate::error::ReportError;

/// Message forwarded for a live error signal.
#[must_use]
pub fn issue_message(service: &str, raw: &str) -> String {
    format!("There was an issue with: {service}. {raw}")
}

/// Message forwarded for a fatal error observed at shutdown.
#[must_use]
pub fn fatal_message(service: &str, raw: &str) -> String {
    format!("There was a fatal error with the {service}. {raw}")
}

/// Forwards classified, enriched records to one sink.
#[derive(Clone)]
pub struct Reporter {
    sink: Arc<dyn LogSink>,
    classifier: Arc<dyn Classifier>,
    context: ContextBuilder,
    backtrace: BacktraceMode,
}

impl Reporter {
    /// Assemble a reporter from its collaborators.
    #[must_use]
    pub fn new(
        sink: Arc<dyn LogSink>,
        classifier: Arc<dyn Classifier>,
        context: ContextBuilder,
        backtrace: BacktraceMode,
    ) -> Self {
        Self {
            sink,
            classifier,
            context,
            backtrace,
        }
    }

    /// Service identity attached to every record.
    #[must_use]
    pub fn service(&self) -> &str {
        self.context.service()
    }

    /// Severity tier of `signal` under the configured classifier.
    #[must_use]
    pub fn classify(&self, signal: &ErrorSignal) -> SeverityTier {
        self.classifier.classify(signal.code)
    }

    /// Forward one live signal. The backtrace is taken here, on the
    /// interception stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the record.
    pub fn report_signal(&self, signal: &ErrorSignal) -> Result<(), ReportError> {
        let backtrace = CapturedBacktrace::capture(self.backtrace);
        let tier = self.classify(signal);
        let message = issue_message(self.service(), &signal.message);
        let context = self.context.build(signal, tier, &backtrace);
        self.forward(tier, &message, &context)
    }

    /// Forward one fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the record.
    pub fn report_fatal(&self, last: &LastError) -> Result<(), ReportError> {
        let tier = self.classifier.classify(last.code);
        let message = fatal_message(self.service(), &last.message);
        let context = self.context.build_fatal(last, tier);
        self.forward(tier, &message, &context)
    }

    fn forward(
        &self,
        tier: SeverityTier,
        message: &str,
        context: &LogContext,
    ) -> Result<(), ReportError> {
        self.sink
            .log(tier, message, context)
            .map_err(|source| ReportError::Sink {
                service: self.service().to_string(),
                source,
            })
    }
}
