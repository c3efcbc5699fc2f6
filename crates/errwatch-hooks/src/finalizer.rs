//! Shutdown path: reports the fatal error, if any, that ended the process.

use std::sync::atomic::{AtomicBool, Ordering};

use errwatch_core::LastError;

use crate::error::ReportError;
use crate::registry::ExitHook;
use crate::reporter::Reporter;

/// Exit hook installed by [`ErrorLogger`](crate::registrar::ErrorLogger).
///
/// Reports at most one fatal error over its lifetime. Chained handlers are
/// not invoked on this path.
pub struct ShutdownFinalizer {
    reporter: Reporter,
    fired: AtomicBool,
}

impl ShutdownFinalizer {
    /// Create a finalizer forwarding through `reporter`.
    #[must_use]
    pub const fn new(reporter: Reporter) -> Self {
        Self {
            reporter,
            fired: AtomicBool::new(false),
        }
    }

    /// Whether a fatal error has already been reported.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

impl ExitHook for ShutdownFinalizer {
    fn on_shutdown(&self, last_error: Option<&LastError>) -> Result<(), ReportError> {
        let Some(last) = last_error else {
            return Ok(());
        };
        if self.fired.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.reporter.report_fatal(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use errwatch_core::{
        BacktraceMode, CapturedBacktrace, ContextBuilder, DefaultClassifier, ErrorCode,
        SeverityTier, context::keys,
    };
    use errwatch_test_support::RecordingSink;
    use serde_json::Map;

    fn finalizer(sink: Arc<RecordingSink>) -> ShutdownFinalizer {
        ShutdownFinalizer::new(Reporter::new(
            sink,
            Arc::new(DefaultClassifier),
            ContextBuilder::new("billing-svc", Map::new()),
            BacktraceMode::Disabled,
        ))
    }

    #[test]
    fn no_last_error_is_a_no_op() {
        let sink = Arc::new(RecordingSink::new());
        let finalizer = finalizer(sink.clone());
        for _ in 0..3 {
            finalizer.on_shutdown(None).expect("no-op");
        }
        assert!(sink.records().is_empty());
        assert!(!finalizer.has_fired());
    }

    #[test]
    fn last_error_is_reported_exactly_once() {
        let sink = Arc::new(RecordingSink::new());
        let finalizer = finalizer(sink.clone());
        let last = LastError::new(ErrorCode::CoreError, "out of memory", "main.rs", 88)
            .with_backtrace(CapturedBacktrace::from_rendered("0: main"));

        for _ in 0..3 {
            finalizer.on_shutdown(Some(&last)).expect("sink accepts record");
        }

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, SeverityTier::Error);
        assert_eq!(
            records[0].message,
            "There was a fatal error with the billing-svc. out of memory"
        );
        assert_eq!(records[0].context.get_str(keys::MESSAGE), Some("out of memory"));
        assert_eq!(records[0].context.get_str(keys::BACKTRACE), Some("0: main"));
        assert!(finalizer.has_fired());
    }

    #[test]
    fn fatal_tier_follows_classification() {
        let sink = Arc::new(RecordingSink::new());
        let finalizer = finalizer(sink.clone());
        let last = LastError::new(ErrorCode::CompileWarning, "shadowed", "lib.rs", 2);
        finalizer.on_shutdown(Some(&last)).expect("sink accepts record");
        assert_eq!(sink.records()[0].level, SeverityTier::Warning);
    }
}
