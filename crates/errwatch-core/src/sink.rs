//! Capabilities supplied by callers: the log sink and chained error handlers.

use crate::context::LogContext;
use crate::error::SinkError;
use crate::severity::SeverityTier;
use crate::signal::ErrorCode;

/// Destination for leveled, structured error records.
pub trait LogSink: Send + Sync {
    /// Accept one record.
    ///
    /// # Errors
    ///
    /// Returns an error when the sink cannot accept or persist the record.
    fn log(
        &self,
        level: SeverityTier,
        message: &str,
        context: &LogContext,
    ) -> Result<(), SinkError>;
}

/// Additional callback invoked for every live error signal.
///
/// Handlers receive the raw fields of the signal, never the enriched context.
pub trait ErrorHandler: Send + Sync {
    /// Observe one signal.
    fn handle(&self, code: ErrorCode, message: &str, file: &str, line: u32);
}

impl<F> ErrorHandler for F
where
    F: Fn(ErrorCode, &str, &str, u32) + Send + Sync,
{
    fn handle(&self, code: ErrorCode, message: &str, file: &str, line: u32) {
        self(code, message, file, line);
    }
}
