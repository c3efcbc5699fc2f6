//! Bridges a [`HookRegistry`] onto the running process.
//!
//! # Design
//! - Panics are the process's fatal errors: the panic hook records them as the
//!   registry's last error, with a backtrace taken inside the hook.
//! - The previously installed panic hook keeps running after ours.
//! - Exit hooks run when the [`ShutdownGuard`] drops, including while the
//!   owning thread unwinds.

use std::panic::{self, PanicHookInfo};
use std::sync::Arc;

use errwatch_core::{BacktraceMode, CapturedBacktrace, ErrorCode, LastError};

use crate::registry::HookRegistry;

const UNKNOWN_PAYLOAD: &str = "unknown panic payload";
const UNKNOWN_FILE: &str = "<unknown>";

/// Record every panic as `registry`'s last error, then defer to the panic hook
/// that was installed before.
///
/// # Panics
///
/// Panics if called from a panicking thread.
pub fn install_panic_hook(registry: Arc<HookRegistry>, mode: BacktraceMode) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        registry.record_fatal(last_error_from_panic(info, mode));
        previous(info);
    }));
}

/// Install the panic hook and return the guard that runs exit hooks on drop.
///
/// # Panics
///
/// Panics if called from a panicking thread.
pub fn install_process_hooks(registry: Arc<HookRegistry>, mode: BacktraceMode) -> ShutdownGuard {
    install_panic_hook(Arc::clone(&registry), mode);
    ShutdownGuard::new(registry)
}

/// Runs the registry's exit hooks when dropped.
#[must_use = "dropping the guard runs the exit hooks immediately"]
pub struct ShutdownGuard {
    registry: Arc<HookRegistry>,
}

impl ShutdownGuard {
    /// Guard `registry` until the end of the enclosing scope.
    pub const fn new(registry: Arc<HookRegistry>) -> Self {
        Self { registry }
    }

    /// Registry the guard shuts down.
    #[must_use]
    pub const fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        let _ = self.registry.shutdown();
    }
}

fn last_error_from_panic(info: &PanicHookInfo<'_>, mode: BacktraceMode) -> LastError {
    let message = info
        .payload()
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
        .unwrap_or(UNKNOWN_PAYLOAD);
    let (file, line) = info
        .location()
        .map_or((UNKNOWN_FILE, 0), |location| (location.file(), location.line()));

    LastError::new(ErrorCode::Error, message, file, line)
        .with_backtrace(CapturedBacktrace::capture(mode))
}
