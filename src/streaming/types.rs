//! Stream event types and terminal outcomes.

use crate::jobs::{CrawlResult, ErrorPayload};
use crate::sse::SseFrame;

/// A single decoded unit of a crawl job stream.
///
/// A well-behaved stream is zero or more `Log` events followed by exactly
/// one terminal event.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// One human-readable progress line.
    Log(String),
    /// Terminal success payload.
    Completion(CrawlResult),
    /// Terminal failure payload.
    Error(ErrorPayload),
}

impl StreamEvent {
    /// Classify a decoded SSE frame.
    ///
    /// Returns `None` for frames that carry nothing for the consumer:
    /// empty payloads and unrecognized event types (keep-alives,
    /// forward-compatible extensions).
    ///
    /// A terminal frame whose payload fails to decode becomes an `Error`
    /// event rather than a fault: a malformed `completion` payload yields
    /// a parse-failure message, a malformed `error` payload falls back to
    /// the raw payload text.
    pub fn from_frame(frame: &SseFrame) -> Option<Self> {
        if frame.data.is_empty() {
            return None;
        }
        match frame.event.as_str() {
            "log" => Some(StreamEvent::Log(frame.data.clone())),
            "completion" => Some(match serde_json::from_str::<CrawlResult>(&frame.data) {
                Ok(result) => StreamEvent::Completion(result),
                Err(err) => StreamEvent::Error(ErrorPayload::message(format!(
                    "failed to parse completion payload: {err}"
                ))),
            }),
            "error" => Some(match serde_json::from_str::<ErrorPayload>(&frame.data) {
                Ok(payload) => StreamEvent::Error(payload),
                Err(_) => StreamEvent::Error(ErrorPayload::message(frame.data.clone())),
            }),
            _ => None,
        }
    }

    /// Check if this event ends the stream's useful lifetime.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completion(_) | StreamEvent::Error(_))
    }

    /// Get the log line if this is a `Log` event.
    pub fn as_log(&self) -> Option<&str> {
        match self {
            StreamEvent::Log(line) => Some(line),
            _ => None,
        }
    }
}

/// Terminal outcome of a streamed crawl job.
///
/// Every job ends in exactly one of these; failure modes that never
/// produce a server-sent `error` frame (mid-stream transport failure,
/// malformed terminal payload, silent stream end) are folded into
/// `Failed` with a synthesized payload.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed(CrawlResult),
    Failed(ErrorPayload),
}

impl JobOutcome {
    /// Check if the job completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed(_))
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<CrawlResult, ErrorPayload> {
        match self {
            JobOutcome::Completed(result) => Ok(result),
            JobOutcome::Failed(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str, data: &str) -> SseFrame {
        SseFrame {
            event: event.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_log_classification() {
        let event = StreamEvent::from_frame(&frame("log", "fetched 3 pages")).unwrap();
        assert_eq!(event, StreamEvent::Log("fetched 3 pages".to_string()));
        assert!(!event.is_terminal());
        assert_eq!(event.as_log(), Some("fetched 3 pages"));
    }

    #[test]
    fn test_unknown_and_empty_ignored() {
        assert!(StreamEvent::from_frame(&frame("heartbeat", "ping")).is_none());
        assert!(StreamEvent::from_frame(&frame("message", "hello")).is_none());
        assert!(StreamEvent::from_frame(&frame("log", "")).is_none());
        assert!(StreamEvent::from_frame(&frame("completion", "")).is_none());
    }

    #[test]
    fn test_completion_classification() {
        let payload = r#"{"message":"done","mdx_files":[],"timings":{"firecrawl_api_seconds":1.0,"mdx_crawler_seconds":2.0,"total_seconds":3.0,"params":{"query":"q","used_max_urls":10,"used_firecrawl_depth":1,"used_crawl_depth":1,"used_time_limit":60}}}"#;
        let event = StreamEvent::from_frame(&frame("completion", payload)).unwrap();
        match &event {
            StreamEvent::Completion(result) => assert_eq!(result.message, "done"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(event.is_terminal());
    }

    #[test]
    fn test_malformed_completion_becomes_error() {
        let event = StreamEvent::from_frame(&frame("completion", "not-json")).unwrap();
        match event {
            StreamEvent::Error(payload) => {
                assert!(payload.error.contains("failed to parse completion payload"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_error_classification() {
        let event =
            StreamEvent::from_frame(&frame("error", r#"{"error":"boom","logs":["a"]}"#)).unwrap();
        match event {
            StreamEvent::Error(payload) => {
                assert_eq!(payload.error, "boom");
                assert_eq!(payload.logs, vec!["a".to_string()]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_error_uses_raw_text() {
        let event = StreamEvent::from_frame(&frame("error", "plain text failure")).unwrap();
        assert_eq!(
            event,
            StreamEvent::Error(ErrorPayload::message("plain text failure"))
        );
    }

    #[test]
    fn test_outcome_into_result() {
        let failed = JobOutcome::Failed(ErrorPayload::message("x"));
        assert!(!failed.is_success());
        assert_eq!(failed.into_result().unwrap_err().error, "x");
    }
}
