//! Stress Test CLI Application
//!
//! Fires a fixed number of HTTP GET requests at one URL with bounded
//! concurrency and prints a status code distribution when they are all done.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use std::process;
use stress_test_lib::{Dispatcher, FailureMapping, RunConfig, StressTestError};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for stress-test
#[derive(Parser, Debug)]
#[command(name = "stress-test")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Stress testing tool")]
#[command(
    long_about = "Send a fixed number of HTTP GET requests to a URL with bounded concurrency.\n\nWhen every request has finished, prints the total count, the time taken, and how many requests ended with each status code."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// URL of the service to test
    #[arg(long = "url", value_name = "URL", help_heading = "Target")]
    pub url: String,

    /// Total number of requests
    #[arg(
        long = "requests",
        value_name = "N",
        default_value_t = 1,
        help_heading = "Load"
    )]
    pub requests: usize,

    /// Number of concurrent requests (must not exceed --requests)
    #[arg(
        long = "concurrency",
        value_name = "N",
        default_value_t = 1,
        help_heading = "Load"
    )]
    pub concurrency: usize,

    /// Report timeouts as 404 and other transport failures as 500
    #[arg(long = "legacy-codes", help_heading = "Load")]
    pub legacy_codes: bool,

    /// Output the report in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Colored report with a success-rate summary
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Verbose logging (to stderr)
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,

    /// Show per-request debug logging (to stderr)
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging(&args);

    // Run the load test
    if let Err(e) = run_load_test(&args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.url.trim().is_empty() {
        return Err("--url must not be empty".to_string());
    }

    if args.requests == 0 {
        return Err("Number of requests must be at least 1".to_string());
    }

    if args.concurrency == 0 {
        return Err("Concurrency must be at least 1".to_string());
    }

    if args.concurrency > args.requests {
        return Err("Concurrency cannot be greater than the number of requests.".to_string());
    }

    // Can't have multiple output formats
    if args.json && args.pretty {
        return Err("Cannot specify both --json and --pretty".to_string());
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--debug` / `--verbose` pick the level.
fn init_logging(args: &Args) {
    let level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("stress_test={0},stress_test_lib={0}", level))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Build the immutable run configuration from CLI arguments.
fn build_config(args: &Args) -> Result<RunConfig, StressTestError> {
    let mapping = if args.legacy_codes {
        FailureMapping::Legacy
    } else {
        FailureMapping::Sentinel
    };
    let config = RunConfig::new(args.url.as_str(), args.requests, args.concurrency)?;
    Ok(config.with_failure_mapping(mapping))
}

/// Run the dispatcher and print the report.
async fn run_load_test(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(args)?;
    let dispatcher = Dispatcher::for_config(&config)?;

    // Structured output keeps stdout to the JSON document only
    let notice = if args.json {
        None
    } else {
        Some(ui::spawn_progress_notice())
    };

    let report = dispatcher.run(&config).await?;

    if let Some(handle) = notice {
        let _ = handle.await;
    }

    if args.json {
        println!("{}", report.render_json()?);
    } else if args.pretty {
        ui::print_pretty_report(&report);
    } else {
        ui::print_report(&report);
    }

    Ok(())
}
