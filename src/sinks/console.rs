//! Console sink implementation

use crate::core::{LogLevel, Record, Result, Sink};
use colored::Colorize;
use std::io::{self, Write};

pub struct ConsoleSink {
    use_colors: bool,
    min_severity: i32,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            min_severity: LogLevel::Trace.as_i32(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            min_severity: LogLevel::Trace.as_i32(),
        }
    }

    /// Only accept records at or above `level`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_logger_core::sinks::ConsoleSink;
    /// use rust_logger_core::LogLevel;
    ///
    /// let sink = ConsoleSink::new().with_min_level(LogLevel::Warn);
    /// ```
    #[must_use]
    pub fn with_min_level(mut self, level: impl Into<i32>) -> Self {
        self.min_severity = level.into();
        self
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn filter(&self, record: &Record<'_>) -> Result<bool> {
        Ok(record.severity() >= self.min_severity)
    }

    fn emit(&self, record: &Record<'_>, formatted: &str) -> Result<()> {
        let level = LogLevel::try_from(record.severity()).ok();

        let painted;
        let output = match level {
            Some(level) if self.use_colors => {
                painted = formatted.color(level.color_code()).to_string();
                painted.as_str()
            }
            _ => formatted,
        };

        // Route Error and Fatal levels to stderr, others to stdout
        if record.severity() >= LogLevel::Error.as_i32() {
            let mut stderr = io::stderr().lock();
            stderr.write_all(output.as_bytes())?;
            stderr.flush()?;
        } else {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
