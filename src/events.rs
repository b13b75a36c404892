//! Host notification events
//!
//! The host supplies an event sink; the tool pushes status updates while a
//! job runs and one message carrying the finished image reference. The serde
//! shape matches the host callback payloads: `{"type": ..., "data": {...}}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Event {
    Status { description: String, done: bool },
    Message { content: String },
}

impl Event {
    pub fn status(description: impl Into<String>, done: bool) -> Self {
        Self::Status {
            description: description.into(),
            done,
        }
    }

    pub fn message(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
        }
    }
}

/// Destination for tool events. Emission has no error channel; a sink that
/// can no longer deliver drops events silently.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

/// Production sink delivering events to the host over an unbounded channel.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: Event) {
        // Receiver gone means the host stopped listening; nothing to do.
        let _ = self.tx.send(event);
    }
}

/// Records emitted events for assertions in tests.
#[derive(Clone, Default)]
pub struct MockEventSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl MockEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for MockEventSink {
    async fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_event_wire_shape() {
        let event = Event::status("Creating image...", false);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "status",
                "data": {"description": "Creating image...", "done": false}
            })
        );
    }

    #[test]
    fn test_message_event_wire_shape() {
        let event = Event::message("![Image](https://x/y.png)");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "message",
                "data": {"content": "![Image](https://x/y.png)"}
            })
        );
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.emit(Event::status("one", false)).await;
        sink.emit(Event::status("two", true)).await;

        assert_eq!(rx.recv().await.unwrap(), Event::status("one", false));
        assert_eq!(rx.recv().await.unwrap(), Event::status("two", true));
    }

    #[tokio::test]
    async fn test_channel_sink_ignores_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        // Must not panic or error.
        sink.emit(Event::message("late")).await;
    }
}
