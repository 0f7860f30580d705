//! Diagnostic channel for failures absorbed by the dispatcher

use parking_lot::Mutex;

/// Receives one line per failure the dispatcher could not hand to a declared
/// category handler.
pub trait Diagnostic: Send + Sync {
    fn report(&self, message: &str);
}

/// Writes diagnostics to the process' standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrDiagnostic;

impl Diagnostic for StderrDiagnostic {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Keeps diagnostics in memory, e.g. to surface them through another channel later.
#[derive(Debug, Default)]
pub struct MemoryDiagnostic {
    messages: Mutex<Vec<String>>,
}

impl MemoryDiagnostic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages reported so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Removes and returns the messages reported so far.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl Diagnostic for MemoryDiagnostic {
    fn report(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

impl<F> Diagnostic for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}
