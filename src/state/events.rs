use tokio::sync::broadcast;

use crate::dto::events::ChannelEvent;

/// Broadcast hub fanning channel events out to every subscribed collaborator.
pub struct EventHub {
    sender: broadcast::Sender<ChannelEvent>,
}

impl EventHub {
    /// Construct a hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ChannelEvent) {
        let _ = self.sender.send(event);
    }
}
