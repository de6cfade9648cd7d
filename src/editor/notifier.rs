//! Content change notification.
//!
//! Every discrete mutation of the document produces exactly one
//! [`ContentChangeEvent`], delivered synchronously to every subscriber.
//! There is no batching or debouncing. With no subscribers the event is
//! simply dropped.

use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{SystemTime, UNIX_EPOCH};

/// Snapshot of the document after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChangeEvent {
    pub serialized_content: String,
    pub timestamp_millis: u64,
}

type Observer = Box<dyn FnMut(&ContentChangeEvent) + Send>;

/// Fan-out of content change events to callbacks and channels.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Vec<Observer>,
    channels: Vec<Sender<ContentChangeEvent>>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .field("channels", &self.channels.len())
            .finish()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked for every event.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&ContentChangeEvent) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Register a channel subscriber. Dropping the receiver unsubscribes.
    pub fn subscribe_channel(&mut self) -> Receiver<ContentChangeEvent> {
        let (tx, rx) = mpsc::channel();
        self.channels.push(tx);
        rx
    }

    /// Whether anything is listening.
    pub fn has_subscribers(&self) -> bool {
        !self.observers.is_empty() || !self.channels.is_empty()
    }

    /// Emit one event for `content`, stamped with the current time.
    pub fn notify(&mut self, content: &str) {
        self.emit(ContentChangeEvent {
            serialized_content: content.to_string(),
            timestamp_millis: now_millis(),
        });
    }

    fn emit(&mut self, event: ContentChangeEvent) {
        if !self.has_subscribers() {
            return;
        }

        for observer in &mut self.observers {
            observer(&event);
        }
        // Receivers that went away are pruned on the next send
        self.channels.retain(|tx| tx.send(event.clone()).is_ok());
        debug!(
            "content change delivered ({} bytes)",
            event.serialized_content.len()
        );
    }
}

/// Milliseconds since the Unix epoch (0 if the clock is before it).
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_observer_receives_content() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut notifier = ChangeNotifier::new();
        notifier.subscribe(move |event| {
            sink.lock().unwrap().push(event.serialized_content.clone());
        });
        notifier.notify("# Title");
        notifier.notify("# Title!");

        assert_eq!(*seen.lock().unwrap(), vec!["# Title", "# Title!"]);
    }

    #[test]
    fn test_channel_subscriber() {
        let mut notifier = ChangeNotifier::new();
        let rx = notifier.subscribe_channel();
        notifier.notify("abc");

        let event = rx.try_recv().unwrap();
        assert_eq!(event.serialized_content, "abc");
        assert!(event.timestamp_millis > 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let mut notifier = ChangeNotifier::new();
        let rx = notifier.subscribe_channel();
        drop(rx);
        notifier.notify("x");
        assert!(!notifier.has_subscribers());
    }

    #[test]
    fn test_no_subscribers_is_silent() {
        let mut notifier = ChangeNotifier::new();
        assert!(!notifier.has_subscribers());
        notifier.notify("nobody listens");
    }

    #[test]
    fn test_event_json_shape() {
        let event = ContentChangeEvent {
            serialized_content: "hi".to_string(),
            timestamp_millis: 42,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"serializedContent":"hi","timestampMillis":42}"#);
    }
}
