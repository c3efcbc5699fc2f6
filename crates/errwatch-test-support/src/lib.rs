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

//! Shared test helpers used across errwatch suites.
//! Layout: fixtures.rs (sample signals), mocks.rs (recording sinks and handlers),
//! capture.rs (in-memory `tracing` event capture).

pub mod capture;
pub mod fixtures;
pub mod mocks;

pub use capture::{CapturedEvent, EventCapture};
pub use mocks::{
    FailingSink, HandlerCall, HandlerJournal, LoggedRecord, RecordingHandler, RecordingSink,
};
