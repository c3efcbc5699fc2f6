//! In-memory sinks and handlers that record what they observe.

use std::sync::{Arc, Mutex, PoisonError};

use errwatch_core::{ErrorCode, ErrorHandler, LogContext, LogSink, SeverityTier, SinkError};

/// One record accepted by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedRecord {
    /// Severity passed to the sink.
    pub level: SeverityTier,
    /// Composed message passed to the sink.
    pub message: String,
    /// Context passed to the sink.
    pub context: LogContext,
}

/// Sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<LoggedRecord>>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records accepted so far, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<LoggedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for RecordingSink {
    fn log(
        &self,
        level: SeverityTier,
        message: &str,
        context: &LogContext,
    ) -> Result<(), SinkError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LoggedRecord {
                level,
                message: message.to_string(),
                context: context.clone(),
            });
        Ok(())
    }
}

/// Sink that rejects every record.
#[derive(Debug, Clone)]
pub struct FailingSink {
    reason: String,
}

impl FailingSink {
    /// Create a sink rejecting records with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl LogSink for FailingSink {
    fn log(&self, _: SeverityTier, _: &str, _: &LogContext) -> Result<(), SinkError> {
        Err(SinkError::rejected(self.reason.clone()))
    }
}

/// One invocation observed by a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerCall {
    /// Label of the handler that was invoked.
    pub handler: String,
    /// Raw code received.
    pub code: ErrorCode,
    /// Raw message received.
    pub message: String,
    /// Raw file received.
    pub file: String,
    /// Raw line received.
    pub line: u32,
}

/// Shared, ordered log of calls across several handlers.
#[derive(Debug, Clone, Default)]
pub struct HandlerJournal {
    calls: Arc<Mutex<Vec<HandlerCall>>>,
}

impl HandlerJournal {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler labelled `label` that writes into this journal.
    #[must_use]
    pub fn handler(&self, label: impl Into<String>) -> RecordingHandler {
        RecordingHandler {
            label: label.into(),
            calls: Arc::clone(&self.calls),
        }
    }

    /// Calls recorded so far, in invocation order.
    #[must_use]
    pub fn calls(&self) -> Vec<HandlerCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Handler that appends each invocation to a [`HandlerJournal`].
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    label: String,
    calls: Arc<Mutex<Vec<HandlerCall>>>,
}

impl ErrorHandler for RecordingHandler {
    fn handle(&self, code: ErrorCode, message: &str, file: &str, line: u32) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(HandlerCall {
                handler: self.label.clone(),
                code,
                message: message.to_string(),
                file: file.to_string(),
                line,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_keeps_cross_handler_order() {
        let journal = HandlerJournal::new();
        let first = journal.handler("first");
        let second = journal.handler("second");

        second.handle(ErrorCode::Warning, "b", "b.rs", 2);
        first.handle(ErrorCode::Notice, "a", "a.rs", 1);

        let labels: Vec<String> = journal.calls().into_iter().map(|call| call.handler).collect();
        assert_eq!(labels, vec!["second".to_string(), "first".to_string()]);
    }

    #[test]
    fn failing_sink_always_rejects() {
        let sink = FailingSink::new("offline");
        let result = sink.log(SeverityTier::Error, "boom", &LogContext::new());
        assert!(matches!(result, Err(SinkError::Rejected { reason }) if reason == "offline"));
    }
}
