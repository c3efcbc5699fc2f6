//! `tracing` layer that raises events as live error signals.
//!
//! # Design
//! - `ERROR`, `WARN`, and `INFO` events map onto the user error, warning, and
//!   notice codes; `DEBUG` and `TRACE` are never signals.
//! - Events under [`INTERNAL_TARGET_PREFIX`] are errwatch's own diagnostics and
//!   sink output, so they are skipped.
//! - A thread-local flag drops events emitted while the same thread is already
//!   dispatching a signal, which keeps sinks that log through `tracing` from
//!   recursing.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use errwatch_core::{CaptureLevel, ErrorCode, ErrorSignal, SeverityTier, classify};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::INTERNAL_TARGET_PREFIX;
use crate::registry::HookRegistry;

const UNKNOWN_FILE: &str = "<unknown>";

thread_local! {
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

/// Raises qualifying `tracing` events through a [`HookRegistry`].
pub struct SignalLayer {
    registry: Arc<HookRegistry>,
    min_tier: SeverityTier,
}

impl SignalLayer {
    /// Raise events at or above `level` through `registry`.
    #[must_use]
    pub const fn new(registry: Arc<HookRegistry>, level: CaptureLevel) -> Self {
        Self {
            registry,
            min_tier: level.min_tier(),
        }
    }
}

impl<S: Subscriber> Layer<S> for SignalLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(INTERNAL_TARGET_PREFIX) {
            return;
        }
        let Some(code) = code_for_level(metadata.level()) else {
            return;
        };
        if classify(code) < self.min_tier {
            return;
        }
        let Some(_scope) = DispatchScope::enter() else {
            return;
        };

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let message = visitor
            .message
            .unwrap_or_else(|| metadata.name().to_string());
        let signal = ErrorSignal::new(
            code,
            message,
            metadata.file().unwrap_or(UNKNOWN_FILE),
            metadata.line().unwrap_or(0),
        );
        let _ = self.registry.raise(&signal);
    }
}

fn code_for_level(level: &Level) -> Option<ErrorCode> {
    if *level == Level::ERROR {
        Some(ErrorCode::UserError)
    } else if *level == Level::WARN {
        Some(ErrorCode::UserWarning)
    } else if *level == Level::INFO {
        Some(ErrorCode::UserNotice)
    } else {
        None
    }
}

struct DispatchScope;

impl DispatchScope {
    fn enter() -> Option<Self> {
        DISPATCHING
            .try_with(|flag| if flag.replace(true) { None } else { Some(Self) })
            .ok()
            .flatten()
    }
}

impl Drop for DispatchScope {
    fn drop(&mut self) {
        let _ = DISPATCHING.try_with(|flag| flag.set(false));
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_user_codes() {
        assert_eq!(code_for_level(&Level::ERROR), Some(ErrorCode::UserError));
        assert_eq!(code_for_level(&Level::WARN), Some(ErrorCode::UserWarning));
        assert_eq!(code_for_level(&Level::INFO), Some(ErrorCode::UserNotice));
        assert_eq!(code_for_level(&Level::DEBUG), None);
        assert_eq!(code_for_level(&Level::TRACE), None);
    }

    #[test]
    fn dispatch_scope_is_not_reentrant() {
        let outer = DispatchScope::enter();
        assert!(outer.is_some());
        assert!(DispatchScope::enter().is_none());
        drop(outer);
        assert!(DispatchScope::enter().is_some());
    }
}
