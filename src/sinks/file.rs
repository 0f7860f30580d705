//! File sink implementation
//!
//! The sink writes every accepted record to the file its path pattern resolves to.
//! Files are opened lazily in append mode, one handle per resolved path, and owned
//! exclusively by the sink: `FileSink` is not `Clone`, moving it moves the handles,
//! and dropping it flushes and closes them.
//!
//! At most [`DEFAULT_MAX_OPEN`] handles (see [`Builder::max_open`]) stay open at once.
//! Opening one more flushes and closes the least recently written destination; it is
//! reopened in append mode when a record resolves to it again.
//!
//! ```compile_fail
//! use rust_logger_core::sinks::FileSink;
//!
//! let sink = FileSink::new("/tmp/app.log").unwrap();
//! let copy = sink.clone();
//! ```

use super::pattern::PathPattern;
use crate::core::{Diagnostic, LoggerError, Record, Result, Sink, StderrDiagnostic};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Buffer size per destination. With an automatic flush interval this is also the
/// amount of output that may sit in memory before reaching the OS.
pub const BUFFER_CAPACITY: usize = 8 * 1024;

/// Default bound on simultaneously open destination files.
pub const DEFAULT_MAX_OPEN: usize = 64;

/// Validated configuration handed over by a sink registry.
///
/// ```
/// use rust_logger_core::sinks::FileSinkConfig;
///
/// let config: FileSinkConfig = serde_json::from_str(r#"{"path": "/tmp/app.log", "flush": 10}"#).unwrap();
/// assert_eq!(config.flush, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSinkConfig {
    pub path: String,
    /// Flush interval in writes, 0 for automatic.
    #[serde(default)]
    pub flush: usize,
}

#[derive(Debug)]
struct Destination {
    path: String,
    writer: BufWriter<File>,
    pending: usize,
    last_used: u64,
}

impl Destination {
    fn open(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| LoggerError::io_operation("creating directory for", path, e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LoggerError::io_operation("opening", path, e))?;

        Ok(Self {
            path: path.to_string(),
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, file),
            pending: 0,
            last_used: 0,
        })
    }

    /// Writes `bytes`, returning whether this write triggered a flush.
    fn write(&mut self, bytes: &[u8], interval: usize) -> Result<bool> {
        self.writer
            .write_all(bytes)
            .map_err(|e| LoggerError::io_operation("writing", &self.path, e))?;

        if interval == 0 {
            return Ok(false);
        }

        self.pending += 1;
        if self.pending < interval {
            return Ok(false);
        }

        self.flush()?;
        Ok(true)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing", &self.path, e))?;
        self.pending = 0;
        Ok(())
    }
}

/// Open destinations keyed by resolved path.
#[derive(Debug, Default)]
struct OpenFiles {
    files: HashMap<String, Destination>,
    clock: u64,
}

impl OpenFiles {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Removes the least recently written destination.
    fn evict_oldest(&mut self) -> Option<Destination> {
        let oldest = self
            .files
            .iter()
            .min_by_key(|(_, destination)| destination.last_used)
            .map(|(path, _)| path.clone())?;
        self.files.remove(&oldest)
    }
}

pub struct FileSink {
    pattern: PathPattern,
    interval: usize,
    max_open: usize,
    destinations: Mutex<OpenFiles>,
    flushes: AtomicU64,
    diagnostic: Arc<dyn Diagnostic>,
}

impl FileSink {
    /// Registry name of this sink type.
    pub const TYPE: &'static str = "file";

    /// Creates a sink with an automatic flush policy.
    ///
    /// No file is opened until the first record arrives, since the path may contain
    /// placeholders resolved per record.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Builder::new(path).build()
    }

    pub fn builder(path: impl Into<String>) -> Builder {
        Builder::new(path)
    }

    pub fn from_config(config: &FileSinkConfig) -> Result<Self> {
        Builder::new(config.path.clone())
            .interval(config.flush)
            .build()
    }

    /// Destination path pattern.
    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    /// Flush interval in writes, 0 for automatic.
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Upper bound on simultaneously open destination files.
    pub fn max_open(&self) -> usize {
        self.max_open
    }

    /// Number of currently open destination files.
    pub fn destinations(&self) -> usize {
        self.destinations.lock().files.len()
    }

    /// Number of interval-driven flushes performed so far.
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    /// Flushes every open destination, reporting the first failure.
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for destination in self.destinations.lock().files.values_mut() {
            if let Err(e) = destination.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Flushes and closes a destination pushed out by the open-file bound.
    fn close_evicted(&self, mut destination: Destination) {
        if let Err(e) = destination.flush() {
            self.diagnostic
                .report(&format!("file sink failed to flush closed destination: {}", e));
        }
    }
}

impl fmt::Debug for FileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.pattern.as_str())
            .field("interval", &self.interval)
            .field("max_open", &self.max_open)
            .field("destinations", &self.destinations())
            .field("flushes", &self.flushes())
            .finish()
    }
}

impl Sink for FileSink {
    fn filter(&self, _record: &Record<'_>) -> Result<bool> {
        Ok(true)
    }

    fn emit(&self, record: &Record<'_>, formatted: &str) -> Result<()> {
        let path = self.pattern.resolve(record)?;
        let mut open = self.destinations.lock();
        let now = open.tick();

        let bytes = formatted.as_bytes();

        let (flushed, evicted) = match open.files.get_mut(&*path) {
            Some(destination) => match destination.write(bytes, self.interval) {
                Ok(flushed) => {
                    destination.last_used = now;
                    (flushed, None)
                }
                Err(e) => {
                    // Reopen on the next record instead of reusing a handle in an unknown state.
                    open.files.remove(&*path);
                    return Err(e);
                }
            },
            None => {
                let mut destination = Destination::open(&path)?;
                let flushed = destination.write(bytes, self.interval)?;
                destination.last_used = now;

                let evicted = if open.files.len() >= self.max_open {
                    open.evict_oldest()
                } else {
                    None
                };
                open.files.insert(path.into_owned(), destination);
                (flushed, evicted)
            }
        };
        drop(open);

        if let Some(evicted) = evicted {
            self.close_evicted(evicted);
        }

        if flushed {
            self.flushes.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        Self::TYPE
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Buffered records are lost if this fails; never let that pass silently.
        if let Err(e) = self.flush() {
            self.diagnostic
                .report(&format!("file sink failed to flush during shutdown: {}", e));
        }
    }
}

/// Configures and creates a [`FileSink`]. Consumed by [`Builder::build`].
///
/// ```no_run
/// use rust_logger_core::sinks::FileSink;
///
/// let sink = FileSink::builder("/var/log/{service}.log")
///     .interval(100)
///     .build()
///     .unwrap();
/// ```
///
/// ```compile_fail
/// use rust_logger_core::sinks::FileSink;
///
/// let builder = FileSink::builder("/tmp/app.log");
/// let again = builder.clone();
/// ```
pub struct Builder {
    path: String,
    interval: usize,
    max_open: usize,
    diagnostic: Arc<dyn Diagnostic>,
}

impl Builder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            interval: 0,
            max_open: DEFAULT_MAX_OPEN,
            diagnostic: Arc::new(StderrDiagnostic),
        }
    }

    /// Flushes after every `count` writes to a destination; 0 leaves flushing to
    /// buffer pressure and teardown.
    #[must_use = "builder methods return a new value"]
    pub fn interval(mut self, count: usize) -> Self {
        self.interval = count;
        self
    }

    /// Bounds the number of destination files kept open at once.
    #[must_use = "builder methods return a new value"]
    pub fn max_open(mut self, count: usize) -> Self {
        self.max_open = count;
        self
    }

    /// Channel for failures with no caller to return them to: flushing on drop and
    /// closing evicted destinations. Defaults to stderr.
    #[must_use = "builder methods return a new value"]
    pub fn diagnostic(mut self, diagnostic: Arc<dyn Diagnostic>) -> Self {
        self.diagnostic = diagnostic;
        self
    }

    /// Validates the path pattern and creates the sink. Nothing is opened yet.
    pub fn build(self) -> Result<FileSink> {
        if self.path.trim().is_empty() {
            return Err(LoggerError::config("FileSink", "path must not be empty"));
        }
        if self.max_open == 0 {
            return Err(LoggerError::config("FileSink", "max_open must be at least 1"));
        }

        Ok(FileSink {
            pattern: PathPattern::parse(&self.path)?,
            interval: self.interval,
            max_open: self.max_open,
            destinations: Mutex::new(OpenFiles::default()),
            flushes: AtomicU64::new(0),
            diagnostic: self.diagnostic,
        })
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("path", &self.path)
            .field("interval", &self.interval)
            .field("max_open", &self.max_open)
            .finish_non_exhaustive()
    }
}
