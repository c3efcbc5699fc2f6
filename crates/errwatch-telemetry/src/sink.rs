//! Log sink that forwards error records into `tracing`.

use errwatch_core::context::keys;
use errwatch_core::{LogContext, LogSink, SeverityTier, SinkError};
use tracing::{error, info, warn};

/// Target of every event emitted by [`TracingSink`].
pub const SINK_TARGET: &str = "errwatch::sink";

/// Emits each record as one `tracing` event: notices at `INFO`, warnings at
/// `WARN`, errors at `ERROR`. The full context travels as a JSON string field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn log(
        &self,
        level: SeverityTier,
        message: &str,
        context: &LogContext,
    ) -> Result<(), SinkError> {
        let context_json =
            serde_json::to_string(context).map_err(|source| SinkError::Serialize { source })?;
        let service = context.get_str(keys::SERVICE).unwrap_or_default();

        match level {
            SeverityTier::Notice => info!(
                target: SINK_TARGET,
                severity = %level,
                service,
                context = %context_json,
                "{message}"
            ),
            SeverityTier::Warning => warn!(
                target: SINK_TARGET,
                severity = %level,
                service,
                context = %context_json,
                "{message}"
            ),
            SeverityTier::Error => error!(
                target: SINK_TARGET,
                severity = %level,
                service,
                context = %context_json,
                "{message}"
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errwatch_test_support::EventCapture;
    use serde_json::{Value, json};
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn records_become_leveled_events_with_context() {
        let capture = EventCapture::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let mut context = LogContext::new();
        context.insert(keys::SERVICE, "billing-svc");
        context.insert(keys::FILE, "x.php");
        context.insert(keys::LINE, 42);

        tracing::subscriber::with_default(subscriber, || {
            TracingSink::new()
                .log(SeverityTier::Warning, "There was an issue", &context)
                .expect("tracing sink never rejects");
            TracingSink::new()
                .log(SeverityTier::Notice, "fyi", &context)
                .expect("tracing sink never rejects");
        });

        let events = capture.events_for(SINK_TARGET);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, Level::WARN);
        assert_eq!(events[0].message(), Some("There was an issue"));
        assert_eq!(events[0].field_str("severity"), Some("warning"));
        assert_eq!(events[0].field_str("service"), Some("billing-svc"));
        let forwarded: Value = serde_json::from_str(events[0].field_str("context").unwrap_or("{}"))
            .expect("context is JSON");
        assert_eq!(forwarded, json!({"service": "billing-svc", "file": "x.php", "line": 42}));
        assert_eq!(events[1].level, Level::INFO);
    }
}
