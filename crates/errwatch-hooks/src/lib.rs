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

//! Interception wiring for errwatch.
//!
//! A [`HookRegistry`] stands in for the process-wide "active error handler" and
//! "exit hook" slots: callers own it, share it behind `Arc`, and every
//! [`ErrorLogger`] installed on it composes with the ones before it.
//!
//! Layout: `reporter.rs` (shared classify/enrich/forward path), `interceptor.rs`
//! (live signals), `finalizer.rs` (fatal error at shutdown), `registry.rs`
//! (interceptor chain, exit hooks, last-error slot), `registrar.rs`
//! (`ErrorLogger` setup), `process.rs` (panic hook and shutdown guard),
//! `layer.rs` (`tracing` events as signals).

pub mod error;
pub mod finalizer;
pub mod interceptor;
pub mod layer;
pub mod process;
pub mod registrar;
pub mod registry;
pub mod reporter;

pub use error::{RegistrarError, RegistryError, ReportError};
pub use finalizer::ShutdownFinalizer;
pub use interceptor::ErrorEventInterceptor;
pub use layer::SignalLayer;
pub use process::{ShutdownGuard, install_panic_hook, install_process_hooks};
pub use registrar::{ErrorLogger, ErrorLoggerOptions};
pub use registry::{DispatchReport, ErrorInterceptor, ExitHook, HookRegistry};
pub use reporter::{Reporter, fatal_message, issue_message};

/// Target prefix shared by every diagnostic errwatch emits about itself.
///
/// [`SignalLayer`] never turns events under this prefix into signals.
pub const INTERNAL_TARGET_PREFIX: &str = "errwatch::";
