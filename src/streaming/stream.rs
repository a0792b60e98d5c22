//! Decode loop: response bytes to an ordered stream of typed events.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::{stream, Stream, StreamExt};

use crate::jobs::ErrorPayload;
use crate::sse::SseFrameDecoder;

use super::handler::StreamObserver;
use super::types::{JobOutcome, StreamEvent};

/// Message synthesized when the body closes with no terminal frame.
pub(crate) const STREAM_ENDED_MESSAGE: &str = "stream ended without completion data.";

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, String>> + Send>>;

struct DecodeState {
    /// Dropped (aborting the transfer) as soon as a terminal event is
    /// handed out; no read may happen after that.
    body: Option<ByteStream>,
    decoder: SseFrameDecoder,
    pending: VecDeque<StreamEvent>,
    finished: bool,
}

/// A finite, non-restartable stream of [`StreamEvent`]s for one job.
///
/// The sequence is zero or more `Log` events followed by exactly one
/// terminal event, then the end of the stream. Terminal means terminal:
/// whatever else the server sends afterwards is never decoded, and the
/// underlying reader is cancelled the moment the terminal event is
/// produced. Failure modes with no server-sent terminal frame (read
/// failure mid-stream, body closing early) synthesize the terminal
/// `Error` event instead, so a consumer always gets a definitive outcome.
pub struct JobStream {
    inner: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
}

impl std::fmt::Debug for JobStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobStream").finish_non_exhaustive()
    }
}

impl JobStream {
    /// Decode a stream of body chunks.
    ///
    /// Chunk boundaries are arbitrary: frames may span chunks and chunks
    /// may hold several frames. Decoded events come out in wire order.
    pub fn from_bytes<S, E>(body: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let body: ByteStream = Box::pin(body.map(|item| item.map_err(|err| err.to_string())));
        let state = DecodeState {
            body: Some(body),
            decoder: SseFrameDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
        };

        let inner = stream::unfold(state, |mut state| async move {
            loop {
                if let Some(event) = state.pending.pop_front() {
                    if event.is_terminal() {
                        state.body = None;
                        state.pending.clear();
                        state.finished = true;
                    }
                    return Some((event, state));
                }
                if state.finished {
                    return None;
                }

                let chunk = match state.body.as_mut() {
                    Some(body) => body.next().await,
                    None => None,
                };
                match chunk {
                    Some(Ok(bytes)) => {
                        for frame in state.decoder.push(&bytes) {
                            if let Some(event) = StreamEvent::from_frame(&frame) {
                                state.pending.push_back(event);
                            }
                        }
                    }
                    Some(Err(message)) => {
                        state.body = None;
                        state.pending.push_back(StreamEvent::Error(ErrorPayload::message(
                            format!("stream read failed: {message}"),
                        )));
                    }
                    None => {
                        state.body = None;
                        state
                            .pending
                            .push_back(StreamEvent::Error(ErrorPayload::message(
                                STREAM_ENDED_MESSAGE,
                            )));
                    }
                }
            }
        });

        Self {
            inner: Box::pin(inner.fuse()),
        }
    }

    /// Wait for the next event, or `None` once the terminal event has
    /// been delivered.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.inner.next().await
    }

    /// Drive the stream to its terminal event, dispatching every event to
    /// the observer in order.
    pub async fn dispatch<O>(mut self, observer: &O) -> JobOutcome
    where
        O: StreamObserver + ?Sized,
    {
        while let Some(event) = self.next_event().await {
            observer.on_event(&event);
            match event {
                StreamEvent::Completion(result) => return JobOutcome::Completed(result),
                StreamEvent::Error(error) => return JobOutcome::Failed(error),
                StreamEvent::Log(_) => {}
            }
        }
        JobOutcome::Failed(ErrorPayload::message(STREAM_ENDED_MESSAGE))
    }
}

impl Stream for JobStream {
    type Item = StreamEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.poll_next_unpin(cx)
    }
}
