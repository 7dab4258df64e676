//! # Stress Test Library
//!
//! Fire a fixed number of HTTP GET requests at one URL with a bounded number
//! in flight, then report how long it took and which status codes came back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stress_test_lib::RunConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::new("http://localhost:8080/", 50, 5)?;
//!     let report = stress_test_lib::run(&config).await?;
//!
//!     print!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded concurrency**: a semaphore admits at most `concurrency` requests at once
//! - **Lossless tally**: every request is counted exactly once, whatever happens to it
//! - **Failure classes**: timeouts and transport errors are kept apart from HTTP statuses
//! - **Pluggable transport**: anything implementing [`Transport`] can be dispatched

// Re-export main public API types and functions
// This makes them available as stress_test_lib::TypeName
pub use client::{HttpTransport, Transport};
pub use concurrent::{run, Dispatcher};
pub use error::StressTestError;
pub use report::RunReport;
pub use tally::{classify, record, ResultTally, SharedTally};
pub use types::{FailureMapping, OutcomeCode, RequestResult, RunConfig, TransportFailure};

// Internal modules - these are not part of the public API
mod client;
mod concurrent;
mod error;
mod report;
mod tally;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, StressTestError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const USER_AGENT: &str = concat!("stress-test/", env!("CARGO_PKG_VERSION"));

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        user_agent: USER_AGENT,
    }
}

/// Information about the library build
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub user_agent: &'static str,
}
