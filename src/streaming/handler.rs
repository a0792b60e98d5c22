//! Stream observer trait and built-in observers.
//!
//! Observers receive decoded job events in arrival order. The stream
//! guarantees at most one terminal callback per job.

use std::sync::Mutex;

use crate::jobs::{CrawlResult, ErrorPayload};

use super::types::StreamEvent;

/// Trait for observing job stream events.
///
/// Implement the per-kind callbacks, or override `on_event` to see every
/// event in one place.
pub trait StreamObserver: Send + Sync {
    /// Called for each progress line, in arrival order.
    fn on_log(&self, _line: &str) {}

    /// Called once if the job completes successfully.
    fn on_completion(&self, _result: &CrawlResult) {}

    /// Called once if the job fails, with the server-sent or synthesized
    /// payload.
    fn on_error(&self, _error: &ErrorPayload) {}

    /// Route an event to the matching callback.
    fn on_event(&self, event: &StreamEvent) {
        match event {
            StreamEvent::Log(line) => self.on_log(line),
            StreamEvent::Completion(result) => self.on_completion(result),
            StreamEvent::Error(error) => self.on_error(error),
        }
    }
}

/// An observer that calls a callback for every event.
pub struct CallbackObserver<F>
where
    F: Fn(&StreamEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackObserver<F>
where
    F: Fn(&StreamEvent) + Send + Sync,
{
    /// Create a new callback observer.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> StreamObserver for CallbackObserver<F>
where
    F: Fn(&StreamEvent) + Send + Sync,
{
    fn on_event(&self, event: &StreamEvent) {
        (self.callback)(event);
    }
}

/// One recorded event with its arrival timestamp.
#[derive(Debug, Clone)]
pub struct ObservedEvent {
    /// ISO 8601 arrival time.
    pub timestamp: String,
    pub event: StreamEvent,
}

/// An observer that buffers events in memory.
pub struct BufferedObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl BufferedObserver {
    /// Create a new buffered observer.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Get all recorded events.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Get the recorded log lines, in arrival order.
    pub fn logs(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|observed| observed.event.as_log().map(String::from))
            .collect()
    }

    /// Get the completion result, if one arrived.
    pub fn completion(&self) -> Option<CrawlResult> {
        self.events.lock().unwrap().iter().find_map(|observed| {
            match &observed.event {
                StreamEvent::Completion(result) => Some(result.clone()),
                _ => None,
            }
        })
    }

    /// Get the error payload, if one arrived.
    pub fn error(&self) -> Option<ErrorPayload> {
        self.events.lock().unwrap().iter().find_map(|observed| {
            match &observed.event {
                StreamEvent::Error(error) => Some(error.clone()),
                _ => None,
            }
        })
    }

    /// Get the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Check if no events were recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the buffer.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Default for BufferedObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamObserver for BufferedObserver {
    fn on_event(&self, event: &StreamEvent) {
        self.events.lock().unwrap().push(ObservedEvent {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event: event.clone(),
        });
    }
}

/// An observer that dispatches to multiple observers.
pub struct MultiObserver {
    observers: Vec<Box<dyn StreamObserver>>,
}

impl MultiObserver {
    /// Create a new multi-observer.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Add an observer.
    pub fn add<O: StreamObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Add a boxed observer.
    pub fn add_boxed(mut self, observer: Box<dyn StreamObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl Default for MultiObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamObserver for MultiObserver {
    fn on_event(&self, event: &StreamEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_callback_observer() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        let observer = CallbackObserver::new(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        observer.on_event(&StreamEvent::Log("a".to_string()));
        observer.on_event(&StreamEvent::Log("b".to_string()));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_buffered_observer() {
        let observer = BufferedObserver::new();

        observer.on_event(&StreamEvent::Log("one".to_string()));
        observer.on_event(&StreamEvent::Log("two".to_string()));
        observer.on_event(&StreamEvent::Error(ErrorPayload::message("boom")));

        assert_eq!(observer.len(), 3);
        assert_eq!(observer.logs(), vec!["one".to_string(), "two".to_string()]);
        assert!(observer.completion().is_none());
        assert_eq!(observer.error().unwrap().error, "boom");
        assert!(!observer.events()[0].timestamp.is_empty());

        observer.clear();
        assert!(observer.is_empty());
    }

    #[test]
    fn test_default_routing() {
        struct LogsOnly(Mutex<Vec<String>>);
        impl StreamObserver for LogsOnly {
            fn on_log(&self, line: &str) {
                self.0.lock().unwrap().push(line.to_string());
            }
        }

        let observer = LogsOnly(Mutex::new(Vec::new()));
        observer.on_event(&StreamEvent::Log("routed".to_string()));
        observer.on_event(&StreamEvent::Error(ErrorPayload::message("ignored")));

        assert_eq!(*observer.0.lock().unwrap(), vec!["routed".to_string()]);
    }

    #[test]
    fn test_multi_observer() {
        let first = Arc::new(BufferedObserver::new());
        let second = Arc::new(BufferedObserver::new());

        struct Shared(Arc<BufferedObserver>);
        impl StreamObserver for Shared {
            fn on_event(&self, event: &StreamEvent) {
                self.0.on_event(event);
            }
        }

        let multi = MultiObserver::new()
            .add(Shared(Arc::clone(&first)))
            .add(Shared(Arc::clone(&second)));

        multi.on_event(&StreamEvent::Log("fan out".to_string()));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }
}
