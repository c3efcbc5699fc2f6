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

//! Telemetry glue for errwatch.
//!
//! Installs the process-wide `tracing` subscriber and provides [`TracingSink`],
//! a log sink that forwards error records as structured `tracing` events.

pub mod error;
pub mod init;
pub mod sink;

pub use error::{Result, TelemetryError};
pub use init::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging, init_logging_with_layer,
    log_format_from_config,
};
pub use sink::{SINK_TARGET, TracingSink};
