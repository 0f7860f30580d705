//! Core record, sink and dispatch types

pub mod attribute;
pub mod category;
pub mod diagnostic;
pub mod dispatcher;
pub mod error;
pub mod log_level;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod sink;

pub use attribute::{Attribute, AttributeList, AttributePack, Value, EMPTY_PACK};
pub use category::{CategoryChain, ErrorCategory};
pub use diagnostic::{Diagnostic, MemoryDiagnostic, StderrDiagnostic};
pub use dispatcher::{Dispatcher, DispatcherBuilder, ErrorHandler};
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use metrics::LoggerMetrics;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use record::{Record, RECORD_STORAGE_SIZE};
pub use sink::Sink;
