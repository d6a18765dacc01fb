//! The global lobby: connection lifecycle and event relay.
//!
//! `RelayCore` owns every piece of mutable lobby state and is driven by the
//! `LobbyActor`, which feeds it one event at a time. Each call returns an
//! `Outbox` with the messages to send; nothing is written to a socket while
//! state is being changed.

mod actor;
mod lifecycle;
mod messages;
mod relay;

pub use actor::{LobbyActor, spawn_lobby};
pub use messages::{Connect, Disconnect, GetPlayers, GetStatus, Inbound};

use crate::anticheat::{ActionKind, RateLimiter, RatePolicy};
use crate::config::ServerConfig;
use crate::error::{RelayError, RelayResult};
use crate::network::Outbox;
use crate::player::{Player, PlayerRegistry};
use crate::types::{ClientMessage, ConnectionId, PlayerId, ServerMessage};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport open, no player bound yet.
    Connected,
    Joined,
    /// Never seen, or already torn down.
    Closed,
}

#[derive(Debug)]
pub struct RelayCore {
    registry: PlayerRegistry,
    limiter: RateLimiter,
    open: HashSet<ConnectionId>,
    move_limit: RatePolicy,
    shoot_limit: RatePolicy,
    max_players: usize,
}

impl RelayCore {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            registry: PlayerRegistry::new(),
            limiter: RateLimiter::new(),
            open: HashSet::new(),
            move_limit: config.move_limit,
            shoot_limit: config.shoot_limit,
            max_players: config.max_players,
        }
    }

    pub fn state(&self, connection: &ConnectionId) -> ConnectionState {
        if !self.open.contains(connection) {
            ConnectionState::Closed
        } else if self.registry.resolve(connection).is_some() {
            ConnectionState::Joined
        } else {
            ConnectionState::Connected
        }
    }

    pub fn population(&self) -> usize {
        self.registry.len()
    }

    pub fn connection_count(&self) -> usize {
        self.open.len()
    }

    pub fn players(&self) -> Vec<Player> {
        self.registry.snapshot_all()
    }

    pub fn player(&self, connection: &ConnectionId) -> Option<&Player> {
        self.registry
            .resolve(connection)
            .and_then(|id| self.registry.get(id))
    }

    /// Number of live rate-limit windows across all connections.
    pub fn rate_windows(&self) -> usize {
        self.limiter.len()
    }

    /// Parses one text frame and handles it.
    pub fn handle_frame(&mut self, connection: ConnectionId, text: &str) -> Outbox {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => self.handle_message(connection, msg),
            Err(e) => {
                let mut out = Outbox::new();
                if self.open.contains(&connection) && is_join_frame(text) {
                    let error = RelayError::Validation(e.to_string());
                    self.report(connection, "join", error, &mut out);
                } else {
                    log::debug!("Dropping unparseable frame from {}: {}", connection, e);
                }
                out
            }
        }
    }

    pub fn handle_message(&mut self, connection: ConnectionId, msg: ClientMessage) -> Outbox {
        let mut out = Outbox::new();
        if !self.open.contains(&connection) {
            log::debug!("Ignoring {} from closed connection {}", msg.kind(), connection);
            return out;
        }

        let kind = msg.kind();
        let result = match msg {
            ClientMessage::Join { player_name } => {
                self.join(connection, player_name.as_ref(), &mut out)
            }
            ClientMessage::Move { position, rotation } => {
                self.on_move(connection, position, rotation, &mut out)
            }
            ClientMessage::Shoot {
                position,
                direction,
            } => self.on_shoot(connection, position, direction, &mut out),
            ClientMessage::Hit { damage, shooter_id } => {
                self.on_hit(connection, damage.as_ref(), shooter_id, &mut out)
            }
            ClientMessage::Death { killer_id } => self.on_death(connection, killer_id, &mut out),
            ClientMessage::Score {
                score_type,
                points,
                target_name,
            } => self.on_score(connection, score_type, points, target_name, &mut out),
            ClientMessage::Heartbeat { ts } => self.on_heartbeat(connection, ts, &mut out),
        };

        if let Err(error) = result {
            self.report(connection, kind, error, &mut out);
        }

        out
    }

    /// The handler boundary: decides what, if anything, the sender hears
    /// about a failed event.
    fn report(&self, connection: ConnectionId, kind: &str, error: RelayError, out: &mut Outbox) {
        match &error {
            RelayError::NotJoined => {
                log::debug!("Ignoring {} from {} before join", kind, connection);
            }
            RelayError::RateLimited(_) => {
                log::debug!("Dropping {} from {}: {}", kind, connection, error);
            }
            RelayError::Internal(_) => {
                log::error!("Failed to handle {} from {}: {}", kind, connection, error);
            }
            _ if kind == "join" && error.notifies_client() => {
                log::warn!("Rejected join from {}: {}", connection, error);
                out.send(
                    connection,
                    ServerMessage::Error {
                        message: error.to_string(),
                    },
                );
            }
            _ => {
                log::warn!("Dropping {} from {}: {}", kind, connection, error);
            }
        }
    }

    /// Resolves the sender's identity, or `NotJoined`.
    fn joined(&self, connection: &ConnectionId) -> RelayResult<PlayerId> {
        self.registry
            .resolve(connection)
            .cloned()
            .ok_or(RelayError::NotJoined)
    }

    fn check_rate(&mut self, connection: ConnectionId, action: ActionKind) -> RelayResult<()> {
        let policy = match action {
            ActionKind::Move => self.move_limit,
            ActionKind::Shoot => self.shoot_limit,
        };

        if self.limiter.allow(connection, action, policy) {
            Ok(())
        } else {
            Err(RelayError::RateLimited(action.as_str()))
        }
    }
}

fn is_join_frame(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|value| value.get("type").and_then(|t| t.as_str()).map(|t| t == "join"))
        .unwrap_or(false)
}

fn missing(id: &PlayerId) -> RelayError {
    RelayError::Internal(format!("player {} bound but not registered", id))
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
