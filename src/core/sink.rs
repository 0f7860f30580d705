//! Sink trait for log output destinations

use super::{error::Result, record::Record};

/// A destination for formatted log records.
///
/// Sinks are shared between logging threads and take `&self`; any state a sink
/// mutates (file handles, counters) is synchronized internally.
pub trait Sink: Send + Sync {
    /// Decides whether this sink accepts `record`. Must not perform I/O.
    fn filter(&self, record: &Record<'_>) -> Result<bool>;

    /// Writes `formatted` for `record`.
    ///
    /// A failed call must leave the sink usable for the next record.
    fn emit(&self, record: &Record<'_>, formatted: &str) -> Result<()>;

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn filter(&self, record: &Record<'_>) -> Result<bool> {
        (**self).filter(record)
    }

    fn emit(&self, record: &Record<'_>, formatted: &str) -> Result<()> {
        (**self).emit(record, formatted)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
