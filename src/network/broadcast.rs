use crate::actor_system::ActorSystem;
use crate::network::ConnectionManager;
use crate::types::{ConnectionId, LobbyEvent, ServerMessage};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Duration, interval};

/// Messages produced while handling one event, in emission order.
///
/// The relay fills an outbox and the lobby actor flushes it once the state
/// change is complete, so no delivery ever interleaves with a mutation.
#[derive(Debug, Default)]
pub struct Outbox {
    deliveries: Vec<(ConnectionId, ServerMessage)>,
    events: Vec<LobbyEvent>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, to: ConnectionId, message: ServerMessage) {
        self.deliveries.push((to, message));
    }

    /// Queues `message` for every recipient except `except`.
    pub fn broadcast<'a>(
        &mut self,
        recipients: impl IntoIterator<Item = &'a ConnectionId>,
        except: Option<&ConnectionId>,
        message: &ServerMessage,
    ) {
        for to in recipients {
            if Some(to) != except {
                self.deliveries.push((*to, message.clone()));
            }
        }
    }

    /// Records a lifecycle event for the system bus.
    pub fn notify(&mut self, event: LobbyEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LobbyEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ConnectionId, ServerMessage)> {
        self.deliveries.iter()
    }

    /// Messages addressed to `connection`, in order.
    pub fn for_connection(&self, connection: &ConnectionId) -> Vec<&ServerMessage> {
        self.deliveries
            .iter()
            .filter(|(to, _)| to == connection)
            .map(|(_, message)| message)
            .collect()
    }

    /// Hands every message to its connection. Returns how many were queued.
    pub fn deliver(self, connections: &ConnectionManager) -> usize {
        let mut delivered = 0;
        for (to, message) in &self.deliveries {
            if connections.send(to, message) {
                delivered += 1;
            } else {
                log::debug!("Dropped message for closed connection {}", to);
            }
        }
        delivered
    }
}

/// Logs lobby arrivals and departures as they happen, plus a periodic
/// population summary.
pub async fn watch_population(
    system: ActorSystem,
    connections: ConnectionManager,
    every: Duration,
) {
    let mut events = system.events();
    let mut ticker = interval(every);
    let mut population = 0usize;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(LobbyEvent::PlayerJoined { player_id, name, population: now }) => {
                    population = now;
                    log::info!("Player {} ({}) joined, {} in lobby", player_id, name, now);
                }
                Ok(LobbyEvent::PlayerLeft { player_id, population: now }) => {
                    population = now;
                    log::info!("Player {} left, {} in lobby", player_id, now);
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Population watcher lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            _ = ticker.tick() => {
                log::debug!(
                    "Lobby: {} players, {} connections",
                    population,
                    connections.count()
                );
            }
        }
    }
}
