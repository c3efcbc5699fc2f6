//! In-memory `tracing` layer for asserting on emitted events.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value, json};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// One event observed by [`EventCapture`].
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Event target.
    pub target: String,
    /// Recorded fields, including `message`.
    pub fields: Map<String, Value>,
}

impl CapturedEvent {
    /// The `message` field, if present.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").and_then(Value::as_str)
    }

    /// A string field, if present.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Layer that stores every event it sees. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    /// Create an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events captured so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events whose target starts with `prefix`.
    #[must_use]
    pub fn events_for(&self, prefix: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.target.starts_with(prefix))
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for EventCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                level: *metadata.level(),
                target: metadata.target().to_string(),
                fields: visitor.values,
            });
    }
}

#[derive(Default)]
struct JsonVisitor {
    values: Map<String, Value>,
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.values
            .insert(field.name().to_string(), json!(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.values.insert(field.name().to_string(), json!(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.values.insert(field.name().to_string(), json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.values.insert(field.name().to_string(), json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.values.insert(field.name().to_string(), json!(value));
    }
}
