//! Wire types for crawl jobs.
//!
//! These mirror the crawl service's JSON contract: the streaming job
//! request/result pair (`/supercrawler`) and the one-shot conversion pair
//! (`/crawl`). Optional request fields are omitted from the serialized
//! body entirely, never sent as null.

use serde::{Deserialize, Serialize};

/// Parameters for a streaming crawl job.
///
/// Every tuning knob is optional; the server substitutes its own default
/// for an omitted field and echoes both the requested and used value back
/// in [`RequestParams`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRequest {
    /// Free-text research query.
    pub query: String,
    /// Maximum number of source URLs to discover.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_urls: Option<u32>,
    /// Link-follow depth for URL discovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// Link-follow depth for content extraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl_depth: Option<u32>,
    /// Wall-clock budget for the job, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u64>,
    /// Credential forwarded to the discovery backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firecrawl_api_key: Option<String>,
}

impl CrawlRequest {
    /// Create a request with server defaults for every knob.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_urls: None,
            max_depth: None,
            crawl_depth: None,
            time_limit: None,
            firecrawl_api_key: None,
        }
    }

    /// Set the maximum number of discovered URLs.
    pub fn with_max_urls(mut self, max_urls: u32) -> Self {
        self.max_urls = Some(max_urls);
        self
    }

    /// Set the discovery depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the content-extraction depth.
    pub fn with_crawl_depth(mut self, crawl_depth: u32) -> Self {
        self.crawl_depth = Some(crawl_depth);
        self
    }

    /// Set the job time budget in seconds.
    pub fn with_time_limit(mut self, time_limit: u64) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Set the discovery-backend credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.firecrawl_api_key = Some(key.into());
        self
    }
}

/// Requested vs. used value for each tunable, echoed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    pub query: String,
    #[serde(default)]
    pub requested_max_urls: Option<u32>,
    pub used_max_urls: u32,
    #[serde(default)]
    pub requested_firecrawl_depth: Option<u32>,
    pub used_firecrawl_depth: u32,
    #[serde(default)]
    pub requested_crawl_depth: Option<u32>,
    pub used_crawl_depth: u32,
    #[serde(default)]
    pub requested_time_limit: Option<u64>,
    pub used_time_limit: u64,
}

/// Timing breakdown for a completed job, with the resolved parameter set
/// nested inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingInfo {
    /// Seconds spent in the discovery backend.
    pub firecrawl_api_seconds: f64,
    /// Seconds spent extracting and converting content.
    pub mdx_crawler_seconds: f64,
    /// Total wall-clock seconds.
    pub total_seconds: f64,
    pub params: RequestParams,
}

/// Terminal success payload of a streaming crawl job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub message: String,
    /// Count of URLs that produced an MDX document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_mdx_url_count: Option<u64>,
    /// Source URLs the discovery pass surfaced.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub initial_urls_from_firecrawl: Vec<String>,
    /// Produced documents as `(identifier, content)` pairs.
    #[serde(default)]
    pub mdx_files: Vec<(String, String)>,
    pub timings: TimingInfo,
}

/// Partial echo of [`RequestParams`]; attached to error payloads, where
/// the server may not have resolved every field yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_max_urls: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_max_urls: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_firecrawl_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_firecrawl_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_crawl_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_crawl_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_time_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_time_limit: Option<u64>,
}

/// Partial [`TimingInfo`] attached to error payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialTimings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firecrawl_api_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mdx_crawler_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<PartialParams>,
}

/// Terminal failure payload of a streaming crawl job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable error description.
    pub error: String,
    /// Progress lines collected before the failure, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<PartialTimings>,
}

impl ErrorPayload {
    /// Create a bare error payload from a message.
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            logs: Vec::new(),
            timings: None,
        }
    }
}

impl std::fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Request body for the one-shot `/crawl` conversion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertRequest {
    /// Root URLs to convert.
    pub domains: Vec<String>,
    /// Link-follow depth below each root.
    pub max_depth: u32,
}

/// Response body of the one-shot `/crawl` conversion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub message: String,
    pub logs: Vec<String>,
    /// Produced documents as `(identifier, content)` pairs.
    pub mdx_files: Vec<(String, String)>,
}
