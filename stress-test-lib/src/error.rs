//! Error handling for stress test runs.
//!
//! Only failures that stop a run from starting live here. Individual request
//! failures are never errors: they are classified into an outcome code and
//! counted in the tally.

use std::fmt;

/// Main error type for the stress test library.
#[derive(Debug, Clone)]
pub enum StressTestError {
    /// Invalid run bounds or target (checked before any request is sent)
    ConfigError { message: String },

    /// The HTTP client could not be constructed
    ClientError {
        message: String,
        source: Option<String>,
    },

    /// A worker task could not be driven to completion
    Internal { message: String },
}

impl StressTestError {
    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new client error with source information.
    pub fn client_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::ClientError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error was caused by user-supplied settings.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }
}

impl fmt::Display for StressTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::ClientError { message, source } => {
                if let Some(source) = source {
                    write!(f, "HTTP client error: {} (source: {})", message, source)
                } else {
                    write!(f, "HTTP client error: {}", message)
                }
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for StressTestError {}

impl From<reqwest::Error> for StressTestError {
    fn from(err: reqwest::Error) -> Self {
        Self::client_with_source("Failed to create HTTP client", err.to_string())
    }
}

impl From<tokio::sync::AcquireError> for StressTestError {
    fn from(err: tokio::sync::AcquireError) -> Self {
        Self::internal(format!("Admission semaphore closed: {}", err))
    }
}
