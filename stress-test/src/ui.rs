//! Output for the stress-test CLI.
//!
//! The plain report goes to stdout exactly as the library renders it. The
//! `--pretty` variant colors the same lines with `console`.

use console::{style, Color};
use stress_test_lib::{OutcomeCode, RunReport};

pub const PROGRESS_NOTICE: &str = "Making requests, please wait....";

/// Print the progress notice from its own task.
///
/// It is informational only; it may land before or after the first requests
/// go out.
pub fn spawn_progress_notice() -> tokio::task::JoinHandle<()> {
    tokio::spawn(async {
        println!("{}", PROGRESS_NOTICE);
    })
}

/// Print the report block exactly as the library renders it.
pub fn print_report(report: &RunReport) {
    print!("{}", report.render_text());
}

/// Print the report with colored status codes and a success-rate footer.
pub fn print_pretty_report(report: &RunReport) {
    println!("{}", style("Report:").bold());
    println!("Total requests: {}", style(report.total_completed).bold());
    println!("Time taken: {:?}", report.elapsed);
    println!("Status code distribution:");
    for (code, count) in report.tally.counts() {
        println!("{} {} requests", styled_code(code), count);
    }
    println!(
        "  {}",
        style("────────────────────────────────────────").dim()
    );
    println!("  {}", style(success_line(report)).dim());
}

fn styled_code(code: OutcomeCode) -> console::StyledObject<String> {
    let label = style(format!("[{}]", code));
    match code_color(code) {
        Some(color) => label.fg(color),
        None => label,
    }
}

/// 2xx green, 4xx yellow, 5xx and failure classes red, anything else plain.
fn code_color(code: OutcomeCode) -> Option<Color> {
    match code {
        OutcomeCode::Status(200..=299) => Some(Color::Green),
        OutcomeCode::Status(400..=499) => Some(Color::Yellow),
        OutcomeCode::Status(500..=599) | OutcomeCode::Timeout | OutcomeCode::TransportError => {
            Some(Color::Red)
        }
        OutcomeCode::Status(_) => None,
    }
}

fn success_line(report: &RunReport) -> String {
    let total = report.total_completed;
    let successful = report.successful();
    let rate = if total == 0 {
        0.0
    } else {
        successful as f64 * 100.0 / total as f64
    };
    let secs = report.elapsed.as_secs_f64();
    let rps = if secs > 0.0 { total as f64 / secs } else { 0.0 };
    format!(
        "{}/{} successful ({:.1}%)  |  {:.1} req/s",
        successful, total, rate, rps
    )
}
