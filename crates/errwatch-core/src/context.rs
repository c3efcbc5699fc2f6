//! Structured context attached to forwarded error records.
//!
//! # Design
//! - Backtraces are captured at the interception site and rendered immediately;
//!   stack state is gone once the call returns.
//! - Base fields are written first and caller-supplied extra context second, so
//!   an extra key that collides with a base key replaces its value in place.
//! - Nothing here can fail; a missing backtrace renders as a placeholder.

use std::backtrace::{Backtrace, BacktraceStatus};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::BacktraceMode;
use crate::severity::SeverityTier;
use crate::signal::{ErrorSignal, LastError};

/// Placeholder rendered when no stack snapshot could be taken.
pub const BACKTRACE_UNAVAILABLE: &str = "<backtrace unavailable>";

/// Field names written by [`ContextBuilder`].
pub mod keys {
    /// Raw error text on the live path.
    pub const ERROR_STRING: &str = "error_string";
    /// Raw error text on the fatal path.
    pub const MESSAGE: &str = "message";
    /// Service identity.
    pub const SERVICE: &str = "service";
    /// Severity tier label.
    pub const ERROR_LEVEL: &str = "error_level";
    /// Source file.
    pub const FILE: &str = "file";
    /// Source line.
    pub const LINE: &str = "line";
    /// Rendered backtrace.
    pub const BACKTRACE: &str = "backtrace";
}

/// Stack snapshot rendered to text at capture time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedBacktrace {
    rendered: Option<String>,
}

impl CapturedBacktrace {
    /// Capture the current stack according to `mode`.
    #[must_use]
    pub fn capture(mode: BacktraceMode) -> Self {
        let backtrace = match mode {
            BacktraceMode::Disabled => return Self::unavailable(),
            BacktraceMode::Capture => Backtrace::capture(),
            BacktraceMode::Force => Backtrace::force_capture(),
        };
        match backtrace.status() {
            BacktraceStatus::Captured => Self {
                rendered: Some(backtrace.to_string()),
            },
            _ => Self::unavailable(),
        }
    }

    /// Snapshot standing in for a stack that could not be captured.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { rendered: None }
    }

    /// Wrap an already rendered stack.
    #[must_use]
    pub fn from_rendered(rendered: impl Into<String>) -> Self {
        Self {
            rendered: Some(rendered.into()),
        }
    }

    /// Whether a real stack was captured.
    #[must_use]
    pub const fn is_captured(&self) -> bool {
        self.rendered.is_some()
    }

    /// Human-readable rendering, or [`BACKTRACE_UNAVAILABLE`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.rendered.as_deref().unwrap_or(BACKTRACE_UNAVAILABLE)
    }
}

/// Ordered key/value context forwarded alongside each log record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogContext {
    fields: Map<String, Value>,
}

impl LogContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Overlay every entry of `extra`, replacing colliding keys.
    pub fn merge(&mut self, extra: &Map<String, Value>) {
        for (key, value) in extra {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a string field.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the context has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Convert into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Builds [`LogContext`] values for one service.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    service: String,
    extra: Map<String, Value>,
}

impl ContextBuilder {
    /// Create a builder for `service` with the given extra context.
    #[must_use]
    pub fn new(service: impl Into<String>, extra: Map<String, Value>) -> Self {
        Self {
            service: service.into(),
            extra,
        }
    }

    /// Service identity written into every context.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Extra context overlaid onto every context.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Context for a live error signal.
    #[must_use]
    pub fn build(
        &self,
        signal: &ErrorSignal,
        tier: SeverityTier,
        backtrace: &CapturedBacktrace,
    ) -> LogContext {
        let mut context = LogContext::new();
        context.insert(keys::ERROR_STRING, signal.message.as_str());
        context.insert(keys::SERVICE, self.service.as_str());
        context.insert(keys::ERROR_LEVEL, tier.as_str());
        context.insert(keys::FILE, signal.file.as_str());
        context.insert(keys::LINE, signal.line);
        context.insert(keys::BACKTRACE, backtrace.as_str());
        context.merge(&self.extra);
        context
    }

    /// Context for a fatal error observed at shutdown.
    #[must_use]
    pub fn build_fatal(&self, last: &LastError, tier: SeverityTier) -> LogContext {
        let mut context = LogContext::new();
        context.insert(keys::MESSAGE, last.message.as_str());
        context.insert(keys::SERVICE, self.service.as_str());
        context.insert(keys::ERROR_LEVEL, tier.as_str());
        context.insert(keys::FILE, last.file.as_str());
        context.insert(keys::LINE, last.line);
        context.insert(keys::BACKTRACE, last.backtrace.as_str());
        context.merge(&self.extra);
        context
    }
}
