//! Network probe abstraction.
//!
//! [`Transport`] is the seam between the validator pool and the network:
//! the pool issues one probe per distinct URL and classifies the outcome.
//! [`HttpTransport`] is the real implementation; [`MockTransport`] is an
//! instrumented test double.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::CheckConfig;

/// Result of a completed probe: the final HTTP status code observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
}

impl ProbeResponse {
    /// 2xx and 3xx responses count as reachable.
    pub fn is_reachable(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Transport-level failure, bucketed into the categories the report records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("timeout")]
    Timeout,
    #[error("connect failed")]
    Connect,
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect
        } else {
            Self::Request(e.without_url().to_string())
        }
    }
}

/// A single-attempt existence check against a URL.
pub trait Transport: Send + Sync {
    fn probe<'a>(
        &'a self,
        url: &'a Url,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<ProbeResponse, ProbeError>> + Send + 'a>>;
}

/// Probe over HTTP: HEAD first, falling back to a ranged GET when the
/// server rejects HEAD (4xx/5xx). Transport errors are not retried; a
/// single attempt per URL is the contract.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &CheckConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn probe<'a>(
        &'a self,
        url: &'a Url,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<ProbeResponse, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let head = self
                .client
                .head(url.clone())
                .timeout(timeout)
                .send()
                .await?;

            let status = head.status();
            if status.is_client_error() || status.is_server_error() {
                // HEAD rejected or unsupported; one ranged GET decides.
                tracing::debug!(url = %url, head_status = status.as_u16(), "HEAD rejected, retrying with ranged GET");
                let get = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::RANGE, "bytes=0-1023")
                    .timeout(timeout)
                    .send()
                    .await?;
                return Ok(ProbeResponse {
                    status: get.status().as_u16(),
                });
            }

            Ok(ProbeResponse {
                status: status.as_u16(),
            })
        })
    }
}

/// Scripted outcome for [`MockTransport`].
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Status(u16),
    Error(ProbeError),
}

/// A hand-rolled mock implementing [`Transport`] for tests.
///
/// Supports per-URL scripted outcomes with a fallback, optional per-call
/// latency, total call counting, and a concurrent-in-flight high-water mark
/// for asserting the pool's concurrency bound.
pub struct MockTransport {
    responses: Mutex<HashMap<String, MockOutcome>>,
    fallback: MockOutcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    /// Create a mock that answers every URL with `fallback`.
    pub fn new(fallback: MockOutcome) -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            fallback,
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Script a specific outcome for one URL (exact string match on the
    /// canonical form).
    pub fn respond(self, url: &str, outcome: MockOutcome) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), outcome);
        self
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many probes have been issued.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of probes that were ever in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn probe<'a>(
        &'a self,
        url: &'a Url,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<ProbeResponse, ProbeError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .responses
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| self.fallback.clone());
        let delay = self.delay;

        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match outcome {
                MockOutcome::Status(code) => Ok(ProbeResponse { status: code }),
                MockOutcome::Error(e) => Err(e),
            }
        })
    }
}
