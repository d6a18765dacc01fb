use super::{ConnectionState, RelayCore};
use crate::anticheat::sanitize_name;
use crate::error::{RelayError, RelayResult};
use crate::network::Outbox;
use crate::player::Player;
use crate::types::{ConnectionId, LobbyEvent, ServerMessage};

impl RelayCore {
    /// Registers a freshly opened transport connection.
    pub fn connect(&mut self, connection: ConnectionId) {
        if !self.open.insert(connection) {
            log::warn!("Connection {} registered twice", connection);
            return;
        }
        log::debug!("Connection {} opened", connection);
    }

    /// Binds a player to `connection` and announces it.
    ///
    /// The newcomer first receives one `playerJoined` per player already in
    /// the lobby (join order), then its own `joinedGame`, and finally the
    /// `playerJoined` that every joined connection, itself included, gets.
    pub(super) fn join(
        &mut self,
        connection: ConnectionId,
        player_name: Option<&serde_json::Value>,
        out: &mut Outbox,
    ) -> RelayResult<()> {
        if self.state(&connection) == ConnectionState::Joined {
            return Err(RelayError::AlreadyJoined);
        }

        if self.max_players > 0 && self.registry.len() >= self.max_players {
            return Err(RelayError::LobbyFull);
        }

        let name = sanitize_name(player_name)?
            .unwrap_or_else(|| format!("Player{}", connection.short()));

        let others = self.registry.snapshot_all();
        let player_id = self.registry.allocate_identity();
        let player = Player::new(player_id.clone(), name.clone());
        let position = player.position;

        if !self.registry.bind(connection, player) {
            return Err(RelayError::Internal(format!(
                "could not bind {} to {}",
                connection, player_id
            )));
        }

        let count = self.registry.len();
        for other in others {
            out.send(
                connection,
                ServerMessage::PlayerJoined {
                    player_id: other.player_id,
                    player_name: other.name,
                    position: other.position,
                    players_count: count,
                },
            );
        }

        out.send(
            connection,
            ServerMessage::JoinedGame {
                player_id: player_id.clone(),
                player_name: name.clone(),
                players_count: count,
            },
        );

        let arrival = ServerMessage::PlayerJoined {
            player_id: player_id.clone(),
            player_name: name.clone(),
            position,
            players_count: count,
        };
        out.broadcast(self.registry.connections(), None, &arrival);

        out.notify(LobbyEvent::PlayerJoined {
            player_id,
            name,
            population: count,
        });
        Ok(())
    }

    /// Tears down everything attached to `connection`. A joined player's
    /// departure is announced to the remaining joined connections.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Outbox {
        let mut out = Outbox::new();
        if !self.open.remove(&connection) {
            log::debug!("Connection {} already closed", connection);
            return out;
        }

        self.limiter.purge(connection);

        match self.registry.unbind(&connection) {
            Some(player) => {
                let count = self.registry.len();
                log::debug!(
                    "Player {} ({}) left with {} health",
                    player.player_id,
                    player.name,
                    player.health
                );

                let departure = ServerMessage::PlayerLeft {
                    player_id: player.player_id.clone(),
                    players_count: count,
                };
                out.broadcast(self.registry.connections(), Some(&connection), &departure);
                out.notify(LobbyEvent::PlayerLeft {
                    player_id: player.player_id,
                    population: count,
                });
            }
            None => log::debug!("Connection {} closed before joining", connection),
        }

        out
    }
}
