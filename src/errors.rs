//! Client error types.

use thiserror::Error;

use crate::jobs::ErrorPayload;

/// Result type alias using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Unified error enum for everything that can fail before a job stream
/// starts producing events.
///
/// Failures *inside* an established stream never surface here: the decode
/// loop converts them to in-band [`crate::StreamEvent::Error`] events.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL could not be parsed
    #[error("invalid base url: {0}")]
    UrlParse(#[from] url::ParseError),

    /// HTTP request failed (network layer)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP response received before any stream body was read
    #[error("api error {status}: {}", error.error)]
    Api {
        /// HTTP status code (e.g., 422, 500)
        status: u16,
        /// Error body, parsed or synthesized
        error: ErrorPayload,
    },
}

impl ClientError {
    /// Create a pre-stream API error from a raw response body.
    ///
    /// The body is best-effort parsed as an [`ErrorPayload`]; anything
    /// else falls back to a generic message carrying the status code.
    pub fn api(status: u16, body: &str) -> Self {
        let error = serde_json::from_str::<ErrorPayload>(body)
            .unwrap_or_else(|_| ErrorPayload::message(format!("HTTP error: status {status}")));
        ClientError::Api { status, error }
    }

    /// Get the HTTP status code if this is an HTTP-level error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a transport-layer failure (request never produced
    /// a response).
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }
}
