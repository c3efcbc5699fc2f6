#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Core model for errwatch: raw error signals, severity tiers, and the
//! structured context attached to every forwarded record.
//!
//! Layout: `signal.rs` (error codes and signals), `severity.rs` (tiers and
//! classification), `context.rs` (backtrace capture and `LogContext`
//! construction), `sink.rs` (sink and handler capabilities), `config.rs`
//! (typed options), `error.rs` (error types).

pub mod config;
pub mod context;
pub mod error;
pub mod severity;
pub mod signal;
pub mod sink;

pub use config::{BacktraceMode, CaptureLevel, ErrorLoggerConfig};
pub use context::{BACKTRACE_UNAVAILABLE, CapturedBacktrace, ContextBuilder, LogContext};
pub use error::{ConfigError, SinkError};
pub use severity::{Classifier, DefaultClassifier, SeverityTier, classify};
pub use signal::{ErrorCode, ErrorSignal, LastError};
pub use sink::{ErrorHandler, LogSink};
