//! Super Crawler client library.
//!
//! This crate provides the client side of the Super Crawler web-to-MDX
//! service:
//! - Job request/response wire types
//! - Incremental SSE frame decoding
//! - Typed job event streams with observer dispatch
//! - HTTP client for job submission and one-shot conversion

pub mod client;
pub mod errors;
pub mod jobs;
pub mod sse;
pub mod streaming;

// Re-export core types at crate root for convenience
pub use client::CrawlClient;
pub use errors::{ClientError, Result};
pub use jobs::{
    ConvertRequest, ConvertResponse, CrawlRequest, CrawlResult, ErrorPayload, PartialParams,
    PartialTimings, RequestParams, TimingInfo,
};
pub use sse::{SseFrame, SseFrameDecoder};

// Re-export streaming types
pub use streaming::{
    BufferedObserver, CallbackObserver, JobOutcome, JobStream, MultiObserver, ObservedEvent,
    StreamEvent, StreamObserver,
};
