use crate::types::{ConnectionId, ServerMessage};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use warp::ws::Message;

/// Outbound channels of every open websocket, keyed by connection.
#[derive(Clone)]
pub struct ConnectionManager {
    connections: Arc<DashMap<ConnectionId, mpsc::UnboundedSender<Message>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
        }
    }

    pub fn add(&self, connection: ConnectionId, sender: mpsc::UnboundedSender<Message>) {
        self.connections.insert(connection, sender);
    }

    pub fn remove(&self, connection: &ConnectionId) {
        self.connections.remove(connection);
    }

    /// Serializes and queues `message` for one connection. Returns false if
    /// the connection is gone.
    pub fn send(&self, connection: &ConnectionId, message: &ServerMessage) -> bool {
        let json = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize outbound message: {}", e);
                return false;
            }
        };

        match self.connections.get(connection) {
            Some(sender) => sender.send(Message::text(json)).is_ok(),
            None => false,
        }
    }

    pub fn count(&self) -> usize {
        self.connections.len()
    }

    pub fn get_connections(&self) -> Vec<ConnectionId> {
        self.connections.iter().map(|entry| *entry.key()).collect()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerId;

    #[test]
    fn test_send_to_registered_connection() {
        let manager = ConnectionManager::new();
        let conn = ConnectionId::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.add(conn, tx);

        let msg = ServerMessage::PlayerLeft {
            player_id: PlayerId::from("abc".to_string()),
            players_count: 0,
        };
        assert!(manager.send(&conn, &msg));

        let received = rx.try_recv().unwrap();
        let value: serde_json::Value = serde_json::from_str(received.to_str().unwrap()).unwrap();
        assert_eq!(value["type"], "playerLeft");
    }

    #[test]
    fn test_send_to_removed_connection() {
        let manager = ConnectionManager::new();
        let conn = ConnectionId::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        manager.add(conn, tx);
        assert_eq!(manager.count(), 1);

        manager.remove(&conn);
        let msg = ServerMessage::Error {
            message: "nope".to_string(),
        };
        assert!(!manager.send(&conn, &msg));
        assert!(manager.get_connections().is_empty());
    }
}
