//! Core data types for a stress test run.
//!
//! This module defines the run configuration and the outcome vocabulary shared
//! by the dispatcher, the tally, and the report renderer.

use crate::error::StressTestError;
use std::fmt;

/// Immutable settings for a single run.
///
/// Built once at startup and handed to the dispatcher. The constructor
/// enforces `1 <= concurrency <= total_requests`, so any `RunConfig` that
/// exists is valid to dispatch.
///
/// # Example
///
/// ```rust
/// use stress_test_lib::RunConfig;
///
/// let config = RunConfig::new("http://localhost:8080/health", 100, 10).unwrap();
/// assert_eq!(config.concurrency(), 10);
///
/// assert!(RunConfig::new("http://localhost:8080/health", 2, 5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    target_url: String,
    total_requests: usize,
    concurrency: usize,
    failure_mapping: FailureMapping,
}

impl RunConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `StressTestError::ConfigError` if:
    /// - The URL is empty
    /// - `total_requests` or `concurrency` is zero
    /// - `concurrency` is greater than `total_requests`
    pub fn new<U: Into<String>>(
        target_url: U,
        total_requests: usize,
        concurrency: usize,
    ) -> Result<Self, StressTestError> {
        let config = Self {
            target_url: target_url.into(),
            total_requests,
            concurrency,
            failure_mapping: FailureMapping::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Choose how transport failures are reported.
    pub fn with_failure_mapping(mut self, mapping: FailureMapping) -> Self {
        self.failure_mapping = mapping;
        self
    }

    /// Re-check the run bounds.
    pub fn validate(&self) -> Result<(), StressTestError> {
        if self.target_url.trim().is_empty() {
            return Err(StressTestError::config("target URL must not be empty"));
        }
        if self.total_requests == 0 {
            return Err(StressTestError::config(
                "number of requests must be at least 1",
            ));
        }
        if self.concurrency == 0 {
            return Err(StressTestError::config("concurrency must be at least 1"));
        }
        if self.concurrency > tokio::sync::Semaphore::MAX_PERMITS {
            return Err(StressTestError::config(format!(
                "concurrency must be at most {}",
                tokio::sync::Semaphore::MAX_PERMITS
            )));
        }
        if self.concurrency > self.total_requests {
            return Err(StressTestError::config(format!(
                "concurrency ({}) cannot be greater than the number of requests ({})",
                self.concurrency, self.total_requests
            )));
        }
        Ok(())
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn total_requests(&self) -> usize {
        self.total_requests
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn failure_mapping(&self) -> FailureMapping {
        self.failure_mapping
    }
}

/// Raw result of one GET attempt, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestResult {
    /// A response arrived with this HTTP status code
    Response(u16),

    /// The request failed before any status code was available
    Failed(TransportFailure),
}

/// Kinds of request failure that never produced an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportFailure {
    /// The transport gave up waiting
    Timeout,

    /// Connection refused, DNS failure, protocol error, etc.
    Other,
}

/// Classification recorded in the tally for one completed request.
///
/// Ordering puts HTTP statuses first (ascending), then the failure classes,
/// which keeps the text report stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutcomeCode {
    /// A genuine HTTP status code
    Status(u16),

    /// Request timed out before a response arrived
    Timeout,

    /// Any other transport-level failure
    TransportError,
}

impl OutcomeCode {
    /// Whether this outcome is an HTTP 2xx response.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Status(200..=299))
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeCode::Status(code) => write!(f, "{}", code),
            OutcomeCode::Timeout => write!(f, "timeout"),
            OutcomeCode::TransportError => write!(f, "transport-error"),
        }
    }
}

/// How transport failures are turned into outcome codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMapping {
    /// Dedicated `timeout` / `transport-error` classes, distinct from HTTP statuses
    #[default]
    Sentinel,

    /// Historical behavior: timeouts count as 404, other failures as 500
    Legacy,
}

impl FailureMapping {
    /// Map a transport failure to the code it is tallied under.
    pub fn outcome_for(self, failure: TransportFailure) -> OutcomeCode {
        match (self, failure) {
            (FailureMapping::Sentinel, TransportFailure::Timeout) => OutcomeCode::Timeout,
            (FailureMapping::Sentinel, TransportFailure::Other) => OutcomeCode::TransportError,
            (FailureMapping::Legacy, TransportFailure::Timeout) => OutcomeCode::Status(404),
            (FailureMapping::Legacy, TransportFailure::Other) => OutcomeCode::Status(500),
        }
    }
}

impl fmt::Display for FailureMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureMapping::Sentinel => write!(f, "Sentinel"),
            FailureMapping::Legacy => write!(f, "Legacy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_accepts_equal_bounds() {
        let config = RunConfig::new("http://localhost", 3, 3).unwrap();
        assert_eq!(config.total_requests(), 3);
        assert_eq!(config.concurrency(), 3);
        assert_eq!(config.failure_mapping(), FailureMapping::Sentinel);
    }

    #[test]
    fn test_run_config_rejects_concurrency_above_requests() {
        let err = RunConfig::new("http://localhost", 2, 3).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("cannot be greater"));
    }

    #[test]
    fn test_run_config_rejects_zero_bounds_and_empty_url() {
        assert!(RunConfig::new("http://localhost", 0, 0).is_err());
        assert!(RunConfig::new("http://localhost", 5, 0).is_err());
        assert!(RunConfig::new("   ", 5, 1).is_err());
    }

    #[test]
    fn test_failure_mapping() {
        let sentinel = FailureMapping::Sentinel;
        assert_eq!(
            sentinel.outcome_for(TransportFailure::Timeout),
            OutcomeCode::Timeout
        );
        assert_eq!(
            sentinel.outcome_for(TransportFailure::Other),
            OutcomeCode::TransportError
        );

        let legacy = FailureMapping::Legacy;
        assert_eq!(
            legacy.outcome_for(TransportFailure::Timeout),
            OutcomeCode::Status(404)
        );
        assert_eq!(
            legacy.outcome_for(TransportFailure::Other),
            OutcomeCode::Status(500)
        );
    }

    #[test]
    fn test_outcome_code_display_and_order() {
        assert_eq!(OutcomeCode::Status(503).to_string(), "503");
        assert_eq!(OutcomeCode::Timeout.to_string(), "timeout");
        assert_eq!(OutcomeCode::TransportError.to_string(), "transport-error");

        let mut codes = vec![
            OutcomeCode::TransportError,
            OutcomeCode::Status(503),
            OutcomeCode::Timeout,
            OutcomeCode::Status(200),
        ];
        codes.sort();
        assert_eq!(
            codes,
            vec![
                OutcomeCode::Status(200),
                OutcomeCode::Status(503),
                OutcomeCode::Timeout,
                OutcomeCode::TransportError,
            ]
        );
        assert!(OutcomeCode::Status(204).is_success());
        assert!(!OutcomeCode::Status(503).is_success());
    }
}
