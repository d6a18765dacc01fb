use crate::types::LobbyEvent;
use tokio::sync::broadcast;

/// Fan-out channel for lobby lifecycle events. Slow subscribers lag and
/// lose the oldest events rather than holding up the publisher.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<LobbyEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        EventBus { sender }
    }

    /// Returns how many subscribers saw the event.
    pub fn send(&self, event: LobbyEvent) -> usize {
        self.sender.send(event).unwrap_or_else(|_| {
            log::trace!("No subscribers for lobby event");
            0
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LobbyEvent> {
        self.sender.subscribe()
    }
}
