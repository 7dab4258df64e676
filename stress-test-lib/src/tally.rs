//! Outcome classification and the shared result tally.

use crate::types::{FailureMapping, OutcomeCode, RequestResult};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Counts of each outcome code observed during one run.
///
/// The dispatcher wraps this in a [`SharedTally`]; every unit of work calls
/// [`record`] exactly once, so `total()` always equals the sum of `counts()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTally {
    counts: BTreeMap<OutcomeCode, u64>,
    total: u64,
}

/// The tally as shared between concurrently running units of work.
pub type SharedTally = Arc<Mutex<ResultTally>>;

impl ResultTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed attempts recorded so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// How many times `code` was recorded.
    pub fn count(&self, code: OutcomeCode) -> u64 {
        self.counts.get(&code).copied().unwrap_or(0)
    }

    /// Observed codes with their counts, ascending by code.
    pub fn counts(&self) -> impl Iterator<Item = (OutcomeCode, u64)> + '_ {
        self.counts.iter().map(|(code, count)| (*code, *count))
    }

    /// Number of distinct outcome codes observed.
    pub fn distinct_codes(&self) -> usize {
        self.counts.len()
    }

    fn increment(&mut self, code: OutcomeCode) {
        *self.counts.entry(code).or_insert(0) += 1;
        self.total += 1;
    }
}

/// Turn a raw request result into the code it is counted under.
pub fn classify(result: &RequestResult, mapping: FailureMapping) -> OutcomeCode {
    match result {
        RequestResult::Response(status) => OutcomeCode::Status(*status),
        RequestResult::Failed(failure) => mapping.outcome_for(*failure),
    }
}

/// Record one completed attempt.
///
/// The whole update (code count and total) happens under a single lock. A
/// poisoned lock is recovered: increments are applied atomically under the
/// guard, so the data is never left half-written.
pub fn record(tally: &SharedTally, code: OutcomeCode) {
    let mut guard = tally.lock().unwrap_or_else(PoisonError::into_inner);
    guard.increment(code);
}

/// Classify and record under one lock acquisition.
pub fn classify_and_record(
    tally: &SharedTally,
    result: &RequestResult,
    mapping: FailureMapping,
) -> OutcomeCode {
    let mut guard = tally.lock().unwrap_or_else(PoisonError::into_inner);
    let code = classify(result, mapping);
    guard.increment(code);
    code
}
