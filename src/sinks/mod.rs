//! Sink implementations

#[cfg(feature = "console")]
pub mod console;
pub mod file;
pub mod pattern;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
pub use file::{Builder as FileSinkBuilder, FileSink, FileSinkConfig};
pub use pattern::PathPattern;

pub use crate::core::Sink;
