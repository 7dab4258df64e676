//! HTTP transport used by the dispatcher.
//!
//! The dispatcher only needs "GET this URL and tell me what happened", so the
//! seam is the small [`Transport`] trait. [`HttpTransport`] is the reqwest
//! implementation used by the CLI; tests plug in scripted transports.

use crate::error::StressTestError;
use crate::types::{RequestResult, TransportFailure};
use std::future::Future;
use tracing::{debug, warn};

/// Something that can issue a single GET and report its raw result.
///
/// Implementations must never fail the run: every error is folded into
/// [`RequestResult::Failed`].
pub trait Transport: Send + Sync + 'static {
    fn get(&self, url: &str) -> impl Future<Output = RequestResult> + Send;
}

/// reqwest-backed transport.
///
/// No request timeout is configured; the client's defaults apply.
#[derive(Clone)]
pub struct HttpTransport {
    /// Shared connection pool for all units of work
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with default settings.
    pub fn new() -> Result<Self, StressTestError> {
        Self::with_pool_size(usize::MAX)
    }

    /// Create a transport that keeps at most `max_idle` idle connections per host.
    ///
    /// The dispatcher sizes this to the concurrency bound so every admitted
    /// unit can reuse a warm connection.
    pub fn with_pool_size(max_idle: usize) -> Result<Self, StressTestError> {
        let http_client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .pool_max_idle_per_host(max_idle)
            .build()?;

        Ok(Self { http_client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> impl Future<Output = RequestResult> + Send {
        let request = self.http_client.get(url);
        async move {
            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    release_body(response).await;
                    RequestResult::Response(status)
                }
                Err(e) => {
                    let failure = failure_kind(&e);
                    debug!(error = %e, ?failure, "request failed before a status was received");
                    RequestResult::Failed(failure)
                }
            }
        }
    }
}

/// Largest body that is read to the end so the connection can be reused.
const MAX_DRAIN_BYTES: u64 = 64 * 1024;

/// Release the response body before the unit finishes.
///
/// Small bodies with a declared length are drained chunk by chunk and thrown
/// away so the connection goes back to the pool. Anything else (chunked,
/// unknown length, large) is dropped unread, which closes the connection.
/// A failure here is logged and otherwise ignored: the status code has
/// already been observed.
async fn release_body(mut response: reqwest::Response) {
    let status = response.status();
    match response.content_length() {
        Some(len) if len <= MAX_DRAIN_BYTES => loop {
            match response.chunk().await {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    warn!(%status, error = %e, "error releasing response body");
                    break;
                }
            }
        },
        declared => {
            debug!(%status, ?declared, "closing response without draining the body");
        }
    }
}

fn failure_kind(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else {
        TransportFailure::Other
    }
}
