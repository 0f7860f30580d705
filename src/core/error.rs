//! Error types for the logging core

use super::category::ErrorCategory;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation} '{path}': {source}")]
    IoOperation {
        operation: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Path pattern could not be parsed
    #[error("Invalid path pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Path placeholder references an attribute the record does not carry
    #[error("Attribute '{name}' required by path pattern '{pattern}' is missing")]
    MissingAttribute { name: String, pattern: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: &'static str,
        path: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn missing_attribute(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        LoggerError::MissingAttribute {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Classifies this error into the closed category set used by the dispatcher.
    pub fn category(&self) -> ErrorCategory {
        match self {
            LoggerError::IoOperation { source, .. } | LoggerError::IoError(source) => {
                ErrorCategory::from_io_kind(source.kind())
            }
            LoggerError::InvalidConfiguration { .. } | LoggerError::InvalidPattern { .. } => {
                ErrorCategory::InvalidConfiguration
            }
            LoggerError::MissingAttribute { .. } => ErrorCategory::MissingAttribute,
            LoggerError::Other(_) => ErrorCategory::Runtime,
        }
    }
}
