//! Sample signals shared by unit and integration suites.

use errwatch_core::{ErrorCode, ErrorSignal, LastError};

/// Service identity used throughout the suites.
pub const SERVICE: &str = "billing-svc";

/// Warning-class signal raised by a deprecated call site.
#[must_use]
pub fn warning_signal() -> ErrorSignal {
    ErrorSignal::new(ErrorCode::UserWarning, "deprecated call", "x.php", 42)
}

/// Notice-class signal.
#[must_use]
pub fn notice_signal() -> ErrorSignal {
    ErrorSignal::new(ErrorCode::Notice, "undefined index: id", "app.php", 17)
}

/// Fatal error as recorded before shutdown.
#[must_use]
pub fn fatal_error() -> LastError {
    LastError::new(ErrorCode::Error, "allowed memory size exhausted", "worker.php", 301)
}
