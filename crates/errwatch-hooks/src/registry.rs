//! Caller-owned registry of error interceptors and exit hooks.
//!
//! # Design
//! - Interceptors form an ordered chain; registering never replaces an earlier
//!   entry.
//! - Dispatch works on a snapshot of the chain so an interceptor can register
//!   further hooks without deadlocking.
//! - The last-error slot is last-writer-wins and survives until shutdown.
//! - The shut-down flag is checked and set while holding the exit-hook lock,
//!   so no registration lands after shutdown has taken its snapshot.
//! - Lock poisoning is ignored: the registry is reached from the panic hook,
//!   where a second panic would abort the process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use errwatch_core::{ErrorSignal, LastError};
use tracing::{debug, warn};

use crate::error::{RegistryError, ReportError};

const REGISTRY_TARGET: &str = "errwatch::registry";

/// Receives every live error signal raised through a [`HookRegistry`].
pub trait ErrorInterceptor: Send + Sync {
    /// Observe one signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal could not be reported.
    fn on_error(&self, signal: &ErrorSignal) -> Result<(), ReportError>;
}

/// Runs once when a [`HookRegistry`] shuts down.
pub trait ExitHook: Send + Sync {
    /// Observe shutdown together with the fatal error recorded before it, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the fatal error could not be reported.
    fn on_shutdown(&self, last_error: Option<&LastError>) -> Result<(), ReportError>;
}

/// Outcome of dispatching one signal or one shutdown.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Hooks that were invoked.
    pub invoked: usize,
    /// Errors returned by those hooks, in invocation order.
    pub failures: Vec<ReportError>,
}

impl DispatchReport {
    /// Whether every invoked hook succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Interceptor chain, exit hooks, and last-error slot for one process.
#[derive(Default)]
pub struct HookRegistry {
    interceptors: RwLock<Vec<Arc<dyn ErrorInterceptor>>>,
    exit_hooks: Mutex<Vec<Arc<dyn ExitHook>>>,
    last_error: Mutex<Option<LastError>>,
    shut_down: AtomicBool,
}

impl HookRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor to the chain.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] once the registry has shut down.
    pub fn add_interceptor(
        &self,
        interceptor: Arc<dyn ErrorInterceptor>,
    ) -> Result<(), RegistryError> {
        let mut interceptors = self
            .interceptors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.ensure_open()?;
        interceptors.push(interceptor);
        debug!(
            target: REGISTRY_TARGET,
            interceptors = interceptors.len(),
            "error interceptor registered"
        );
        Ok(())
    }

    /// Append an exit hook.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] once the registry has shut down.
    pub fn add_exit_hook(&self, hook: Arc<dyn ExitHook>) -> Result<(), RegistryError> {
        let mut hooks = lock(&self.exit_hooks);
        self.ensure_open()?;
        hooks.push(hook);
        debug!(target: REGISTRY_TARGET, exit_hooks = hooks.len(), "exit hook registered");
        Ok(())
    }

    /// Append an interceptor and an exit hook together: either both are
    /// registered or neither is.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Closed`] once the registry has shut down.
    pub fn add_hooks(
        &self,
        interceptor: Arc<dyn ErrorInterceptor>,
        hook: Arc<dyn ExitHook>,
    ) -> Result<(), RegistryError> {
        let mut hooks = lock(&self.exit_hooks);
        let mut interceptors = self
            .interceptors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.ensure_open()?;
        interceptors.push(interceptor);
        hooks.push(hook);
        debug!(
            target: REGISTRY_TARGET,
            interceptors = interceptors.len(),
            exit_hooks = hooks.len(),
            "hook pair registered"
        );
        Ok(())
    }

    /// Deliver a live signal to every interceptor in registration order.
    ///
    /// A failing interceptor is logged and recorded; the rest still run.
    pub fn raise(&self, signal: &ErrorSignal) -> DispatchReport {
        let chain: Vec<Arc<dyn ErrorInterceptor>> = self
            .interceptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut report = DispatchReport::default();
        for interceptor in chain {
            report.invoked += 1;
            if let Err(err) = interceptor.on_error(signal) {
                warn!(
                    target: REGISTRY_TARGET,
                    error = %err,
                    code = %signal.code,
                    "error interceptor failed"
                );
                report.failures.push(err);
            }
        }
        report
    }

    /// Record the fatal error that will be reported at shutdown.
    pub fn record_fatal(&self, error: LastError) {
        *lock(&self.last_error) = Some(error);
    }

    /// Fatal error recorded so far, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<LastError> {
        lock(&self.last_error).clone()
    }

    /// Forget the recorded fatal error.
    pub fn clear_last_error(&self) {
        *lock(&self.last_error) = None;
    }

    /// Run every exit hook once, in registration order, and close the registry.
    ///
    /// Calls after the first return an empty report.
    pub fn shutdown(&self) -> DispatchReport {
        let hooks: Vec<Arc<dyn ExitHook>> = {
            let hooks = lock(&self.exit_hooks);
            if self.shut_down.swap(true, Ordering::AcqRel) {
                return DispatchReport::default();
            }
            hooks.clone()
        };
        let last_error = self.last_error();

        let mut report = DispatchReport::default();
        for hook in hooks {
            report.invoked += 1;
            if let Err(err) = hook.on_shutdown(last_error.as_ref()) {
                warn!(target: REGISTRY_TARGET, error = %err, "exit hook failed");
                report.failures.push(err);
            }
        }
        debug!(
            target: REGISTRY_TARGET,
            exit_hooks = report.invoked,
            fatal = last_error.is_some(),
            "hook registry shut down"
        );
        report
    }

    /// Whether [`shutdown`](Self::shutdown) has run.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Number of registered interceptors.
    #[must_use]
    pub fn interceptor_count(&self) -> usize {
        self.interceptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of registered exit hooks.
    #[must_use]
    pub fn exit_hook_count(&self) -> usize {
        lock(&self.exit_hooks).len()
    }

    fn ensure_open(&self) -> Result<(), RegistryError> {
        if self.is_shut_down() {
            return Err(RegistryError::Closed);
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use errwatch_core::{ErrorCode, SinkError};

    struct Tagged {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl ErrorInterceptor for Tagged {
        fn on_error(&self, signal: &ErrorSignal) -> Result<(), ReportError> {
            lock(&self.log).push(format!("{}:{}", self.tag, signal.message));
            if self.fail {
                return Err(ReportError::Sink {
                    service: self.tag.to_string(),
                    source: SinkError::rejected("down"),
                });
            }
            Ok(())
        }
    }

    impl ExitHook for Tagged {
        fn on_shutdown(&self, last_error: Option<&LastError>) -> Result<(), ReportError> {
            let detail = last_error.map_or("none", |last| last.message.as_str());
            lock(&self.log).push(format!("{}:exit:{detail}", self.tag));
            Ok(())
        }
    }

    fn tagged(tag: &'static str, log: &Arc<Mutex<Vec<String>>>, fail: bool) -> Arc<Tagged> {
        Arc::new(Tagged {
            tag,
            log: Arc::clone(log),
            fail,
        })
    }

    #[test]
    fn interceptors_compose_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = HookRegistry::new();
        registry
            .add_interceptor(tagged("first", &log, true))
            .expect("open registry");
        registry
            .add_interceptor(tagged("second", &log, false))
            .expect("open registry");

        let report = registry.raise(&ErrorSignal::new(ErrorCode::Warning, "w", "a.rs", 1));

        assert_eq!(report.invoked, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.is_clean());
        assert_eq!(*lock(&log), vec!["first:w".to_string(), "second:w".to_string()]);
        assert_eq!(registry.interceptor_count(), 2);
    }

    #[test]
    fn shutdown_runs_exit_hooks_once_with_last_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = HookRegistry::new();
        registry
            .add_exit_hook(tagged("a", &log, false))
            .expect("open registry");
        registry
            .add_exit_hook(tagged("b", &log, false))
            .expect("open registry");
        registry.record_fatal(LastError::new(ErrorCode::Error, "first", "a.rs", 1));
        registry.record_fatal(LastError::new(ErrorCode::Error, "second", "a.rs", 2));

        let report = registry.shutdown();
        let again = registry.shutdown();

        assert_eq!(report.invoked, 2);
        assert!(report.is_clean());
        assert_eq!(again.invoked, 0);
        assert!(registry.is_shut_down());
        assert_eq!(
            *lock(&log),
            vec!["a:exit:second".to_string(), "b:exit:second".to_string()]
        );
    }

    #[test]
    fn shutdown_without_fatal_error_passes_none() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = HookRegistry::new();
        registry
            .add_exit_hook(tagged("a", &log, false))
            .expect("open registry");
        registry.record_fatal(LastError::new(ErrorCode::Error, "gone", "a.rs", 1));
        registry.clear_last_error();

        let _ = registry.shutdown();

        assert_eq!(*lock(&log), vec!["a:exit:none".to_string()]);
    }

    #[test]
    fn closed_registry_rejects_registration() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = HookRegistry::new();
        let _ = registry.shutdown();

        assert!(matches!(
            registry.add_interceptor(tagged("late", &log, false)),
            Err(RegistryError::Closed)
        ));
        assert!(matches!(
            registry.add_exit_hook(tagged("late", &log, false)),
            Err(RegistryError::Closed)
        ));
        assert_eq!(registry.exit_hook_count(), 0);
    }

    #[test]
    fn hook_pair_registers_both_or_neither() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = HookRegistry::new();
        registry
            .add_hooks(tagged("pair", &log, false), tagged("pair", &log, false))
            .expect("open registry");
        assert_eq!(registry.interceptor_count(), 1);
        assert_eq!(registry.exit_hook_count(), 1);

        let _ = registry.shutdown();
        assert!(matches!(
            registry.add_hooks(tagged("late", &log, false), tagged("late", &log, false)),
            Err(RegistryError::Closed)
        ));
        assert_eq!(registry.interceptor_count(), 1);
        assert_eq!(registry.exit_hook_count(), 1);
    }
}
