//! Typed event streaming for crawl jobs.
//!
//! This module turns the service's SSE response body into an ordered,
//! finite stream of typed events:
//! - Event classification and terminal outcomes
//! - Observer trait and built-in observers
//! - The decode loop over the response byte stream

pub mod handler;
pub mod stream;
pub mod types;

pub use handler::{BufferedObserver, CallbackObserver, MultiObserver, ObservedEvent, StreamObserver};
pub use stream::JobStream;
pub use types::{JobOutcome, StreamEvent};
