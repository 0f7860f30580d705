//! Panic hook behaviour around protected calls
//!
//! Kept in its own test binary: it replaces the process-wide panic hook.

use rust_logger_core::prelude::*;
use std::io;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

struct ExplodingSink;

impl Sink for ExplodingSink {
    fn filter(&self, _record: &Record<'_>) -> rust_logger_core::Result<bool> {
        Ok(true)
    }

    fn emit(&self, _record: &Record<'_>, _formatted: &str) -> rust_logger_core::Result<()> {
        panic!("sink exploded");
    }

    fn name(&self) -> &str {
        "exploding"
    }
}

struct BrokenPipeSink;

impl Sink for BrokenPipeSink {
    fn filter(&self, _record: &Record<'_>) -> rust_logger_core::Result<bool> {
        Ok(true)
    }

    fn emit(&self, _record: &Record<'_>, _formatted: &str) -> rust_logger_core::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away").into())
    }

    fn name(&self) -> &str {
        "broken-pipe"
    }
}

#[test]
fn test_protected_panics_bypass_panic_hook() {
    // Installed before the first protected call, so it becomes the wrapped hook.
    panic::set_hook(Box::new(|_| {
        HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }));

    let diagnostic = Arc::new(MemoryDiagnostic::new());
    let handler_diagnostic = Arc::clone(&diagnostic);
    let pipeline = Pipeline::builder()
        .sink(ExplodingSink)
        .sink(BrokenPipeSink)
        .dispatcher(
            Dispatcher::builder(categories![ErrorCategory::Io])
                .on_error(move |_, _| {
                    handler_diagnostic.report("handler ran");
                    panic!("handler exploded");
                })
                .shared_diagnostic(diagnostic.clone())
                .strict(false)
                .build(),
        )
        .build();

    pipeline.dispatch(&Record::new(LogLevel::Info, "m", EMPTY_PACK), "m\n");

    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 0);
    assert_eq!(
        diagnostic.messages(),
        vec![
            "logging core error occurred: sink exploded",
            "handler ran",
            "logging core error occurred: error handler panicked",
        ]
    );

    // Panics outside protected calls still reach the previous hook.
    let outside = panic::catch_unwind(|| panic!("unrelated"));
    assert!(outside.is_err());
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 1);
}
