//! Player registry: identity → player, connection → identity.
//!
//! The registry is owned by the lobby actor and only ever touched from its
//! mailbox loop, so every method runs to completion before the next event is
//! looked at. `bind` and `unbind` update both maps in the same call.

use crate::player::Player;
use crate::types::{ConnectionId, IDENTITY_LEN, PlayerId};
use rand::Rng;
use rand::distr::Alphanumeric;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, Player>,
    bindings: HashMap<ConnectionId, PlayerId>,
    /// Join order, used for snapshots.
    order: Vec<PlayerId>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Random alphanumeric identity that no live player is using.
    pub fn allocate_identity(&self) -> PlayerId {
        loop {
            let token: String = rand::rng()
                .sample_iter(Alphanumeric)
                .take(IDENTITY_LEN)
                .map(char::from)
                .collect();
            let id = PlayerId::from(token);
            if !self.players.contains_key(&id) {
                return id;
            }
            log::warn!("Identity collision on {}, regenerating", id);
        }
    }

    /// Binds `connection` to a new player. Returns false and changes nothing
    /// if either side is already taken.
    pub fn bind(&mut self, connection: ConnectionId, player: Player) -> bool {
        if self.bindings.contains_key(&connection) || self.players.contains_key(&player.player_id)
        {
            return false;
        }

        let id = player.player_id.clone();
        self.bindings.insert(connection, id.clone());
        self.order.push(id.clone());
        self.players.insert(id, player);
        true
    }

    pub fn resolve(&self, connection: &ConnectionId) -> Option<&PlayerId> {
        self.bindings.get(connection)
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Runs `f` against the player's record and returns its result.
    pub fn mutate<R>(&mut self, id: &PlayerId, f: impl FnOnce(&mut Player) -> R) -> Option<R> {
        self.players.get_mut(id).map(f)
    }

    /// Every live player in join order.
    pub fn snapshot_all(&self) -> Vec<Player> {
        self.order
            .iter()
            .filter_map(|id| self.players.get(id))
            .cloned()
            .collect()
    }

    /// Removes the binding and its player, returning the final state.
    pub fn unbind(&mut self, connection: &ConnectionId) -> Option<Player> {
        let id = self.bindings.remove(connection)?;
        self.order.retain(|other| *other != id);
        self.players.remove(&id)
    }

    /// Connections that currently have a player bound.
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionId> {
        self.bindings.keys()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn join(registry: &mut PlayerRegistry, name: &str) -> (ConnectionId, PlayerId) {
        let conn = ConnectionId::new();
        let id = registry.allocate_identity();
        assert!(registry.bind(conn, Player::new(id.clone(), name.to_string())));
        (conn, id)
    }

    #[test]
    fn test_allocate_identity_shape() {
        let registry = PlayerRegistry::new();
        let id = registry.allocate_identity();
        assert_eq!(id.as_str().len(), IDENTITY_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, registry.allocate_identity());
    }

    #[test]
    fn test_bind_and_resolve() {
        let mut registry = PlayerRegistry::new();
        let (conn, id) = join(&mut registry, "Ann");

        assert_eq!(registry.resolve(&conn), Some(&id));
        assert_eq!(registry.get(&id).unwrap().name, "Ann");
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve(&ConnectionId::new()).is_none());
    }

    #[test]
    fn test_connection_binds_once() {
        let mut registry = PlayerRegistry::new();
        let (conn, _) = join(&mut registry, "Ann");
        let other = registry.allocate_identity();

        assert!(!registry.bind(conn, Player::new(other.clone(), "Bob".to_string())));
        assert!(registry.get(&other).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_preserves_join_order() {
        let mut registry = PlayerRegistry::new();
        let (_, a) = join(&mut registry, "A");
        let (conn_b, _) = join(&mut registry, "B");
        let (_, c) = join(&mut registry, "C");

        registry.unbind(&conn_b);
        let ids: Vec<PlayerId> = registry
            .snapshot_all()
            .into_iter()
            .map(|p| p.player_id)
            .collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_mutate() {
        let mut registry = PlayerRegistry::new();
        let (_, id) = join(&mut registry, "Ann");

        let moved = registry.mutate(&id, |p| {
            p.move_to(Position::new(1.0, 2.0, 3.0));
            p.position
        });
        assert_eq!(moved, Some(Position::new(1.0, 2.0, 3.0)));

        let missing = PlayerId::from("nobody".to_string());
        assert!(registry.mutate(&missing, |p| p.kill()).is_none());
    }

    #[test]
    fn test_unbind_returns_final_state() {
        let mut registry = PlayerRegistry::new();
        let (conn, id) = join(&mut registry, "Ann");
        registry.mutate(&id, |p| p.apply_damage(40.0));

        let removed = registry.unbind(&conn).unwrap();
        assert_eq!(removed.health, 60);
        assert!(registry.is_empty());
        assert!(registry.resolve(&conn).is_none());
        assert!(registry.unbind(&conn).is_none());
        assert_eq!(registry.connections().count(), 0);
    }
}
