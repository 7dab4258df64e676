//! Final run report and its renderings.
//!
//! A [`RunReport`] is built once, after the completion barrier, and is never
//! mutated afterwards. Rendering only reads it.

use crate::tally::ResultTally;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Read-only snapshot of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Number of units of work that completed (success or failure)
    pub total_completed: u64,

    /// Wall-clock time from first dispatch to the completion barrier
    pub elapsed: Duration,

    /// Final outcome counts
    pub tally: ResultTally,
}

/// JSON shape of a report, as printed by `--json`.
#[derive(Debug, Serialize)]
struct JsonReport {
    total_requests: u64,
    elapsed_ms: f64,
    successful_requests: u64,
    status_codes: BTreeMap<String, u64>,
}

impl RunReport {
    pub fn new(tally: ResultTally, elapsed: Duration) -> Self {
        Self {
            total_completed: tally.total(),
            elapsed,
            tally,
        }
    }

    /// Number of 2xx responses.
    pub fn successful(&self) -> u64 {
        self.tally
            .counts()
            .filter(|(code, _)| code.is_success())
            .map(|(_, count)| count)
            .sum()
    }

    /// Render the plain-text report block.
    ///
    /// ```text
    /// Report:
    /// Total requests: 10
    /// Time taken: 12.3ms
    /// Status code distribution:
    /// [200] 10 requests
    /// ```
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Report:\n");
        out.push_str(&format!("Total requests: {}\n", self.total_completed));
        out.push_str(&format!("Time taken: {:?}\n", self.elapsed));
        out.push_str("Status code distribution:\n");
        for (code, count) in self.tally.counts() {
            out.push_str(&format!("[{}] {} requests\n", code, count));
        }
        out
    }

    /// Render the report as pretty-printed JSON.
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        let report = JsonReport {
            total_requests: self.total_completed,
            elapsed_ms: self.elapsed.as_secs_f64() * 1000.0,
            successful_requests: self.successful(),
            status_codes: self
                .tally
                .counts()
                .map(|(code, count)| (code.to_string(), count))
                .collect(),
        };
        serde_json::to_string_pretty(&report)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::{record, SharedTally};
    use crate::types::OutcomeCode;
    use std::sync::{Arc, Mutex};

    fn make_report(codes: &[OutcomeCode]) -> RunReport {
        let tally: SharedTally = Arc::new(Mutex::new(ResultTally::new()));
        for code in codes {
            record(&tally, *code);
        }
        let tally = tally.lock().unwrap().clone();
        RunReport::new(tally, Duration::from_millis(42))
    }

    #[test]
    fn test_render_text_layout() {
        let report = make_report(&[
            OutcomeCode::Status(200),
            OutcomeCode::Status(503),
            OutcomeCode::Status(200),
            OutcomeCode::Timeout,
        ]);

        let text = report.render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Report:",
                "Total requests: 4",
                "Time taken: 42ms",
                "Status code distribution:",
                "[200] 2 requests",
                "[503] 1 requests",
                "[timeout] 1 requests",
            ]
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let report = make_report(&[OutcomeCode::Status(200), OutcomeCode::TransportError]);
        let before = report.clone();

        assert_eq!(report.render_text(), report.render_text());
        assert_eq!(report.to_string(), report.render_text());
        assert_eq!(report.render_json().unwrap(), report.render_json().unwrap());
        assert_eq!(report, before);
    }

    #[test]
    fn test_render_json() {
        let report = make_report(&[
            OutcomeCode::Status(200),
            OutcomeCode::Status(200),
            OutcomeCode::Status(404),
            OutcomeCode::TransportError,
        ]);

        let json: serde_json::Value = serde_json::from_str(&report.render_json().unwrap()).unwrap();
        assert_eq!(json["total_requests"], 4);
        assert_eq!(json["successful_requests"], 2);
        assert_eq!(json["status_codes"]["200"], 2);
        assert_eq!(json["status_codes"]["404"], 1);
        assert_eq!(json["status_codes"]["transport-error"], 1);
        assert_eq!(json["elapsed_ms"], 42.0);
    }

    #[test]
    fn test_empty_tally_renders_header_only() {
        let report = RunReport::new(ResultTally::new(), Duration::ZERO);
        assert_eq!(report.total_completed, 0);
        assert!(report.render_text().ends_with("Status code distribution:\n"));
    }
}
