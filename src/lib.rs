//! # Rust Logger Core
//!
//! The core of a structured logging library: the representation of a single log
//! event and the machinery that delivers it to pluggable sinks without letting a
//! failing sink disturb the caller or the other sinks.
//!
//! ## Features
//!
//! - **Allocation-free records**: [`Record`] borrows everything it describes
//! - **Pluggable sinks**: the [`Sink`] trait, a pattern-driven [`FileSink`] and a console sink
//! - **Fault isolation**: [`Dispatcher`] absorbs sink errors and panics, routing them
//!   through a compile-time checked [`CategoryChain`]
//! - **Thread safe**: pipelines and sinks are shared freely between logging threads

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::categories;
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    pub use crate::sinks::{FileSink, FileSinkConfig};
    pub use crate::core::{
        AttributeList, AttributePack, CategoryChain, Diagnostic, Dispatcher, ErrorCategory,
        LogLevel, LoggerError, LoggerMetrics, MemoryDiagnostic, Pipeline, Record, Result, Sink,
        StderrDiagnostic, Value, EMPTY_PACK,
    };
}

#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
pub use sinks::{FileSink, FileSinkConfig};
pub use core::{
    Attribute, AttributeList, AttributePack, CategoryChain, Diagnostic, Dispatcher,
    DispatcherBuilder, ErrorCategory, ErrorHandler, LogLevel, LoggerError, LoggerMetrics,
    MemoryDiagnostic, Pipeline, PipelineBuilder, Record, Result, Sink, StderrDiagnostic, Value,
    EMPTY_PACK, RECORD_STORAGE_SIZE,
};
