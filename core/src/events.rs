//! Publish/subscribe notification channel.
//!
//! The bus is an explicit value handed to whoever publishes; cloning it
//! shares the same underlying channel.

use tokio::sync::broadcast;
use tracing::trace;

/// Topic for user-facing error messages.
pub const MAIN_ERROR_TOPIC: &str = "main-error";

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub topic: String,
    pub payload: String,
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Subscribers that fall more than `capacity` events behind lose the
    /// oldest ones. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers saw the event. Zero is not an error.
    pub fn publish(&self, topic: &str, payload: impl Into<String>) -> usize {
        let event = Event {
            topic: topic.to_string(),
            payload: payload.into(),
        };
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!(topic, "event published with no subscribers");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
