//! Concurrency-bounded request dispatch.
//!
//! The dispatcher fans `total_requests` units of work out over the tokio
//! runtime, admitting at most `concurrency` of them at a time, and fans back
//! in at a hard completion barrier before building the report.

use crate::client::{HttpTransport, Transport};
use crate::error::StressTestError;
use crate::report::RunReport;
use crate::tally::{classify_and_record, record, ResultTally, SharedTally};
use crate::types::{FailureMapping, OutcomeCode, RequestResult, RunConfig, TransportFailure};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Runs one stress test against a single target.
///
/// # Example
///
/// ```rust,no_run
/// use stress_test_lib::{Dispatcher, RunConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = RunConfig::new("http://localhost:8080/", 100, 10)?;
///     let report = Dispatcher::for_config(&config)?.run(&config).await?;
///     print!("{}", report);
///     Ok(())
/// }
/// ```
pub struct Dispatcher<T: Transport = HttpTransport> {
    transport: Arc<T>,
}

impl Dispatcher<HttpTransport> {
    /// Create a dispatcher backed by reqwest, with its pool sized for `config`.
    pub fn for_config(config: &RunConfig) -> Result<Self, StressTestError> {
        let transport = HttpTransport::with_pool_size(config.concurrency())?;
        Ok(Self::with_transport(transport))
    }
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher over any transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Issue every request in `config` and wait for all of them.
    ///
    /// Units are only spawned once they hold an admission permit, so no more
    /// than `concurrency` tasks exist at any time. Permits are owned by the
    /// unit and returned when it finishes, whichever way it finishes.
    ///
    /// # Errors
    ///
    /// Returns `StressTestError::ConfigError` if the bounds are invalid. Failed
    /// requests are never errors; they show up in the report's tally.
    pub async fn run(&self, config: &RunConfig) -> Result<RunReport, StressTestError> {
        config.validate()?;

        let url: Arc<str> = Arc::from(config.target_url());
        let mapping = config.failure_mapping();
        let tally: SharedTally = Arc::new(Mutex::new(ResultTally::new()));
        let admission = Arc::new(Semaphore::new(config.concurrency()));
        let mut units = JoinSet::new();

        info!(
            url = %url,
            requests = config.total_requests(),
            concurrency = config.concurrency(),
            mapping = %mapping,
            "starting run"
        );
        let start_time = Instant::now();

        for unit in 0..config.total_requests() {
            let permit = admission.clone().acquire_owned().await?;

            // Reap finished units so the join set stays bounded.
            while let Some(joined) = units.try_join_next() {
                log_join_failure(joined);
            }

            let transport = self.transport.clone();
            let url = url.clone();
            let guard = UnitGuard::new(tally.clone(), mapping);
            units.spawn(async move {
                let _permit = permit;
                let result = transport.get(&url).await;
                let code = guard.complete(&result);
                debug!(unit, %code, "request completed");
            });
        }

        // Completion barrier
        while let Some(joined) = units.join_next().await {
            log_join_failure(joined);
        }

        let elapsed = start_time.elapsed();
        let tally = std::mem::take(&mut *tally.lock().unwrap_or_else(PoisonError::into_inner));
        info!(completed = tally.total(), ?elapsed, "run finished");

        Ok(RunReport::new(tally, elapsed))
    }
}

/// Run a stress test with the default reqwest transport.
pub async fn run(config: &RunConfig) -> Result<RunReport, StressTestError> {
    Dispatcher::for_config(config)?.run(config).await
}

/// Makes sure a unit records exactly one outcome.
///
/// If the unit unwinds before [`UnitGuard::complete`] runs, the drop handler
/// records a transport failure instead.
struct UnitGuard {
    tally: SharedTally,
    mapping: FailureMapping,
    recorded: bool,
}

impl UnitGuard {
    fn new(tally: SharedTally, mapping: FailureMapping) -> Self {
        Self {
            tally,
            mapping,
            recorded: false,
        }
    }

    fn complete(mut self, result: &RequestResult) -> OutcomeCode {
        self.recorded = true;
        classify_and_record(&self.tally, result, self.mapping)
    }
}

impl Drop for UnitGuard {
    fn drop(&mut self) {
        if !self.recorded {
            let code = self.mapping.outcome_for(TransportFailure::Other);
            warn!(%code, "unit of work aborted before recording a result");
            record(&self.tally, code);
        }
    }
}

fn log_join_failure(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "unit of work did not finish cleanly");
    }
}
