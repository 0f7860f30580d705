//! Fault-isolating dispatcher
//!
//! [`Dispatcher::protect`] runs one call into a sink and absorbs whatever goes wrong:
//! returned errors and panics alike. Failures are classified against a
//! [`CategoryChain`]:
//!
//! 1. the first declared category the failure belongs to selects the error handler;
//! 2. anything else reaches the fallback, which writes
//!    `logging core error occurred: <description>` to the diagnostic channel and, in
//!    strict mode only, re-raises.
//!
//! Panics carrying a [`LoggerError`] payload are classified like returned errors.
//! Other panics never match a declared category.
//!
//! The process panic hook stays silent for panics caught inside a protected call, so
//! the diagnostic line is the only output. Panics elsewhere still reach the hook that
//! was installed before the first protected call.

use super::category::{CategoryChain, ErrorCategory};
use super::diagnostic::{Diagnostic, StderrDiagnostic};
use super::error::{LoggerError, Result};
use super::metrics::LoggerMetrics;
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};

/// Action invoked for failures matched by a declared category.
pub type ErrorHandler = Arc<dyn Fn(ErrorCategory, &LoggerError) + Send + Sync>;

const FALLBACK_PREFIX: &str = "logging core error occurred";

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    static PROTECTED_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Marks the current thread as running a protected call until dropped.
struct ProtectedScope;

impl ProtectedScope {
    fn enter() -> Self {
        PROTECTED_DEPTH.with(|depth| depth.set(depth.get() + 1));
        ProtectedScope
    }
}

impl Drop for ProtectedScope {
    fn drop(&mut self) {
        PROTECTED_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn is_protected() -> bool {
    PROTECTED_DEPTH.with(|depth| depth.get() > 0)
}

/// Wraps the current panic hook once so it skips panics raised in protected calls.
fn install_quiet_hook() {
    // The hook cannot be replaced while this thread unwinds; retry on a later call.
    if std::thread::panicking() {
        return;
    }
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !is_protected() {
                previous(info);
            }
        }));
    });
}

/// `catch_unwind` without panic hook output for `call`.
fn catch_quietly<R>(call: impl FnOnce() -> R) -> std::thread::Result<R> {
    install_quiet_hook();
    let _scope = ProtectedScope::enter();
    panic::catch_unwind(AssertUnwindSafe(call))
}

/// Immutable after construction and safe to share between logging threads.
#[derive(Clone)]
pub struct Dispatcher {
    chain: CategoryChain,
    handler: Option<ErrorHandler>,
    diagnostic: Arc<dyn Diagnostic>,
    strict: bool,
    metrics: Arc<LoggerMetrics>,
}

impl Dispatcher {
    /// Dispatcher with no declared categories, reporting every failure to stderr.
    #[must_use]
    pub fn new() -> Self {
        DispatcherBuilder::new(CategoryChain::EMPTY).build()
    }

    /// # Example
    /// ```
    /// use rust_logger_core::prelude::*;
    ///
    /// let dispatcher = Dispatcher::builder(categories![ErrorCategory::PermissionDenied, ErrorCategory::Io])
    ///     .on_error(|category, err| eprintln!("sink failed ({}): {}", category, err))
    ///     .strict(false)
    ///     .build();
    ///
    /// let value = dispatcher.protect(|| Err::<(), _>(LoggerError::other("boom")));
    /// assert!(value.is_none());
    /// ```
    #[must_use]
    pub fn builder(chain: CategoryChain) -> DispatcherBuilder {
        DispatcherBuilder::new(chain)
    }

    pub fn chain(&self) -> CategoryChain {
        self.chain
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn metrics(&self) -> &Arc<LoggerMetrics> {
        &self.metrics
    }

    /// Runs `call`, returning its value or `None` if it failed.
    ///
    /// Never unwinds, except in strict mode for failures that reach the fallback.
    pub fn protect<T, F>(&self, call: F) -> Option<T>
    where
        F: FnOnce() -> Result<T>,
    {
        match catch_quietly(call) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(error)) => {
                self.handle_error(error);
                None
            }
            Err(payload) => {
                self.handle_panic(payload);
                None
            }
        }
    }

    fn handle_error(&self, error: LoggerError) {
        let Some(category) = self.chain.classify(error.category()) else {
            self.metrics.record_unhandled();
            self.report(Some(&error.to_string()));
            if self.strict {
                panic!("{}: {}", FALLBACK_PREFIX, error);
            }
            return;
        };

        self.metrics.record_handled();
        match &self.handler {
            Some(handler) => {
                let outcome = catch_quietly(|| handler(category, &error));
                if outcome.is_err() {
                    self.report(Some("error handler panicked"));
                }
            }
            None => self.report(Some(&error.to_string())),
        }
    }

    fn handle_panic(&self, payload: Box<dyn Any + Send>) {
        self.metrics.record_panic();
        let payload = match payload.downcast::<LoggerError>() {
            Ok(error) => return self.handle_error(*error),
            Err(payload) => payload,
        };

        self.metrics.record_unhandled();
        self.report(panic_message(payload.as_ref()));

        if self.strict {
            panic::resume_unwind(payload);
        }
    }

    fn report(&self, description: Option<&str>) {
        let message = format!("{}: {}", FALLBACK_PREFIX, description.unwrap_or("unknown"));
        self.diagnostic.report(&message);
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some(s)
    } else {
        payload.downcast_ref::<String>().map(String::as_str)
    }
}

/// Builder for constructing a [`Dispatcher`]
pub struct DispatcherBuilder {
    chain: CategoryChain,
    handler: Option<ErrorHandler>,
    diagnostic: Arc<dyn Diagnostic>,
    strict: bool,
    metrics: Option<Arc<LoggerMetrics>>,
}

impl DispatcherBuilder {
    pub fn new(chain: CategoryChain) -> Self {
        Self {
            chain,
            handler: None,
            diagnostic: Arc::new(StderrDiagnostic),
            strict: cfg!(feature = "strict"),
            metrics: None,
        }
    }

    /// Action for failures matched by a declared category.
    ///
    /// Without one, matched failures are reported like unmatched ones, minus the
    /// strict-mode re-raise.
    #[must_use = "builder methods return a new value"]
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(ErrorCategory, &LoggerError) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn diagnostic<D: Diagnostic + 'static>(mut self, diagnostic: D) -> Self {
        self.diagnostic = Arc::new(diagnostic);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_diagnostic(mut self, diagnostic: Arc<dyn Diagnostic>) -> Self {
        self.diagnostic = diagnostic;
        self
    }

    /// Re-raise failures that reach the fallback after reporting them.
    ///
    /// Defaults to on when the `strict` feature is enabled.
    #[must_use = "builder methods return a new value"]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Share counters with other dispatchers.
    #[must_use = "builder methods return a new value"]
    pub fn metrics(mut self, metrics: Arc<LoggerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            chain: self.chain,
            handler: self.handler,
            diagnostic: self.diagnostic,
            strict: self.strict,
            metrics: self.metrics.unwrap_or_default(),
        }
    }
}
