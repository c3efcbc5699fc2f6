//! Live error path: one sink call per signal, then the handler chain.

use std::sync::Arc;

use errwatch_core::{ErrorHandler, ErrorSignal};

use crate::error::ReportError;
use crate::registry::ErrorInterceptor;
use crate::reporter::Reporter;

/// Interceptor installed by [`ErrorLogger`](crate::registrar::ErrorLogger).
pub struct ErrorEventInterceptor {
    reporter: Reporter,
    handlers: Vec<Arc<dyn ErrorHandler>>,
}

impl ErrorEventInterceptor {
    /// Create an interceptor forwarding through `reporter` and then calling
    /// `handlers` in order.
    #[must_use]
    pub fn new(reporter: Reporter, handlers: Vec<Arc<dyn ErrorHandler>>) -> Self {
        Self { reporter, handlers }
    }

    /// Number of chained handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl ErrorInterceptor for ErrorEventInterceptor {
    /// A sink failure is returned only after every chained handler has run.
    fn on_error(&self, signal: &ErrorSignal) -> Result<(), ReportError> {
        let forwarded = self.reporter.report_signal(signal);
        for handler in &self.handlers {
            handler.handle(signal.code, &signal.message, &signal.file, signal.line);
        }
        forwarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errwatch_core::{
        BacktraceMode, ContextBuilder, DefaultClassifier, ErrorCode, LogSink, SeverityTier,
        context::keys,
    };
    use errwatch_test_support::{FailingSink, HandlerJournal, RecordingSink};
    use serde_json::{Map, Value, json};

    fn reporter(sink: Arc<dyn LogSink>, extra: Map<String, Value>) -> Reporter {
        Reporter::new(
            sink,
            Arc::new(DefaultClassifier),
            ContextBuilder::new("billing-svc", extra),
            BacktraceMode::Disabled,
        )
    }

    #[test]
    fn warning_signal_produces_one_sink_call() {
        let sink = Arc::new(RecordingSink::new());
        let interceptor =
            ErrorEventInterceptor::new(reporter(sink.clone(), Map::new()), Vec::new());

        let signal = ErrorSignal::new(ErrorCode::UserWarning, "deprecated call", "x.php", 42);
        interceptor.on_error(&signal).expect("sink accepts record");

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.level, SeverityTier::Warning);
        assert_eq!(
            record.message,
            "There was an issue with: billing-svc. deprecated call"
        );
        assert_eq!(record.context.get_str(keys::FILE), Some("x.php"));
        assert_eq!(record.context.get(keys::LINE), Some(&json!(42)));
        for key in [
            keys::ERROR_STRING,
            keys::SERVICE,
            keys::ERROR_LEVEL,
            keys::FILE,
            keys::LINE,
            keys::BACKTRACE,
        ] {
            assert!(record.context.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn handlers_run_in_order_with_raw_fields() {
        let sink = Arc::new(RecordingSink::new());
        let journal = HandlerJournal::new();
        let handlers: Vec<Arc<dyn ErrorHandler>> =
            vec![Arc::new(journal.handler("h1")), Arc::new(journal.handler("h2"))];
        let mut extra = Map::new();
        extra.insert("file".into(), json!("override.txt"));
        let interceptor = ErrorEventInterceptor::new(reporter(sink.clone(), extra), handlers);

        let signal = ErrorSignal::new(ErrorCode::Notice, "undefined index", "app.php", 9);
        interceptor.on_error(&signal).expect("sink accepts record");

        let calls = journal.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].handler, "h1");
        assert_eq!(calls[1].handler, "h2");
        for call in &calls {
            assert_eq!(call.code, ErrorCode::Notice);
            assert_eq!(call.message, "undefined index");
            assert_eq!(call.file, "app.php");
            assert_eq!(call.line, 9);
        }
        assert_eq!(
            sink.records()[0].context.get_str(keys::FILE),
            Some("override.txt")
        );
    }

    #[test]
    fn sink_failure_still_runs_handlers() {
        let journal = HandlerJournal::new();
        let handlers: Vec<Arc<dyn ErrorHandler>> = vec![Arc::new(journal.handler("h1"))];
        let interceptor = ErrorEventInterceptor::new(
            reporter(Arc::new(FailingSink::new("offline")), Map::new()),
            handlers,
        );

        let signal = ErrorSignal::new(ErrorCode::Error, "boom", "main.rs", 1);
        let err = interceptor.on_error(&signal).expect_err("sink fails");

        assert!(matches!(
            err,
            ReportError::Sink { ref service, .. } if service == "billing-svc"
        ));
        assert_eq!(journal.calls().len(), 1);
        assert_eq!(interceptor.handler_count(), 1);
    }
}
