//! HTTP client for the crawl service.

use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};

use crate::errors::{ClientError, Result};
use crate::jobs::{ConvertRequest, ConvertResponse, CrawlRequest};
use crate::streaming::{JobOutcome, JobStream, StreamObserver};

/// Path of the streaming job endpoint.
const STREAM_PATH: &str = "/supercrawler";

/// Path of the one-shot conversion endpoint.
const CONVERT_PATH: &str = "/crawl";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POOL_SIZE: usize = 8;

/// Client for the crawl service.
///
/// One client may submit any number of jobs; each submission owns its own
/// response stream and decoder, so jobs never share mutable state.
///
/// # Example
///
/// ```ignore
/// let client = CrawlClient::new("http://localhost:8080")?;
/// let request = CrawlRequest::new("latest advancements in ai").with_max_urls(10);
/// let observer = BufferedObserver::new();
/// let outcome = client.run(&request, &observer).await?;
/// ```
#[derive(Clone)]
pub struct CrawlClient {
    base_url: String,
    http: reqwest::Client,
}

impl CrawlClient {
    /// Create a client for the service at `base_url`.
    ///
    /// The underlying HTTP client carries no overall request timeout: job
    /// streams are open-ended, and a deadline, if wanted, belongs around
    /// the call (e.g. `tokio::time::timeout`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(DEFAULT_POOL_SIZE)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Get the configured base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a streaming crawl job.
    ///
    /// Returns the job's event stream. Fails before any streaming begins
    /// if the endpoint is unreachable or answers with a non-success
    /// status; the error body is best-effort parsed as an
    /// [`crate::ErrorPayload`], falling back to a message carrying the
    /// status code.
    pub async fn submit(&self, request: &CrawlRequest) -> Result<JobStream> {
        let url = format!("{}{STREAM_PATH}", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::api(status.as_u16(), &body));
        }

        Ok(JobStream::from_bytes(resp.bytes_stream()))
    }

    /// Submit a job and drive its stream to the terminal event,
    /// dispatching every event to the observer in order.
    pub async fn run<O>(&self, request: &CrawlRequest, observer: &O) -> Result<JobOutcome>
    where
        O: StreamObserver + ?Sized,
    {
        let stream = self.submit(request).await?;
        Ok(stream.dispatch(observer).await)
    }

    /// One-shot conversion of a fixed URL set, plain JSON both ways.
    pub async fn convert(&self, request: &ConvertRequest) -> Result<ConvertResponse> {
        let url = format!("{}{CONVERT_PATH}", self.base_url);
        let resp = self.http.post(&url).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::api(status.as_u16(), &body));
        }

        Ok(resp.json::<ConvertResponse>().await?)
    }
}
