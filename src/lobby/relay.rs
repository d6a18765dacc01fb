//! Per-event handlers for joined connections.
//!
//! Every handler runs the same pipeline: resolve the sender, validate the
//! payload, apply the rate limit, mutate the sender's own record, fan out.
//! A failure at any step leaves state untouched and emits nothing.

use super::{RelayCore, missing, now_millis};
use crate::anticheat::{ActionKind, damage_amount, validate_move, validate_shoot};
use crate::error::RelayResult;
use crate::network::Outbox;
use crate::types::{ConnectionId, Position, ServerMessage};

impl RelayCore {
    pub(super) fn on_move(
        &mut self,
        connection: ConnectionId,
        position: Position,
        rotation: Position,
        out: &mut Outbox,
    ) -> RelayResult<()> {
        let player_id = self.joined(&connection)?;
        validate_move(&position, &rotation)?;
        self.check_rate(connection, ActionKind::Move)?;

        self.registry
            .mutate(&player_id, |player| player.move_to(position))
            .ok_or_else(|| missing(&player_id))?;

        let moved = ServerMessage::PlayerMoved {
            player_id,
            position,
            rotation,
            timestamp: now_millis(),
        };
        out.broadcast(self.registry.connections(), Some(&connection), &moved);
        Ok(())
    }

    pub(super) fn on_shoot(
        &mut self,
        connection: ConnectionId,
        position: Position,
        direction: Position,
        out: &mut Outbox,
    ) -> RelayResult<()> {
        let player_id = self.joined(&connection)?;
        validate_shoot(&position, &direction)?;
        self.check_rate(connection, ActionKind::Shoot)?;

        log::debug!("Player {} fired", player_id);
        let shot = ServerMessage::PlayerShot {
            player_id,
            position,
            direction,
            timestamp: now_millis(),
        };
        out.broadcast(self.registry.connections(), Some(&connection), &shot);
        Ok(())
    }

    /// The victim reports its own damage; `shooter_id` is passed through
    /// as-is.
    pub(super) fn on_hit(
        &mut self,
        connection: ConnectionId,
        damage: Option<&serde_json::Value>,
        shooter_id: Option<String>,
        out: &mut Outbox,
    ) -> RelayResult<()> {
        let player_id = self.joined(&connection)?;
        let damage = damage_amount(damage);

        let health = self
            .registry
            .mutate(&player_id, |player| player.apply_damage(damage))
            .ok_or_else(|| missing(&player_id))?;

        let hit = ServerMessage::PlayerWasHit {
            player_id,
            damage,
            health,
            shooter_id,
        };
        out.broadcast(self.registry.connections(), Some(&connection), &hit);
        Ok(())
    }

    pub(super) fn on_death(
        &mut self,
        connection: ConnectionId,
        killer_id: Option<String>,
        out: &mut Outbox,
    ) -> RelayResult<()> {
        let player_id = self.joined(&connection)?;

        self.registry
            .mutate(&player_id, |player| player.kill())
            .ok_or_else(|| missing(&player_id))?;

        log::debug!(
            "Player {} died (killer: {})",
            player_id,
            killer_id.as_deref().unwrap_or("unknown")
        );
        let died = ServerMessage::PlayerDied {
            player_id,
            killer_id,
            timestamp: now_millis(),
        };
        out.broadcast(self.registry.connections(), Some(&connection), &died);
        Ok(())
    }

    /// Scores are public: the sender hears its own announcement too.
    pub(super) fn on_score(
        &mut self,
        connection: ConnectionId,
        score_type: Option<String>,
        points: Option<serde_json::Number>,
        target_name: Option<String>,
        out: &mut Outbox,
    ) -> RelayResult<()> {
        let player_id = self.joined(&connection)?;
        let player_name = self
            .registry
            .get(&player_id)
            .map(|player| player.name.clone())
            .ok_or_else(|| missing(&player_id))?;

        let scored = ServerMessage::PlayerScored {
            player_id,
            player_name,
            score_type,
            points,
            target_name,
            timestamp: now_millis(),
        };
        out.broadcast(self.registry.connections(), None, &scored);
        Ok(())
    }

    pub(super) fn on_heartbeat(
        &mut self,
        connection: ConnectionId,
        ts: Option<serde_json::Number>,
        out: &mut Outbox,
    ) -> RelayResult<()> {
        self.joined(&connection)?;
        out.send(
            connection,
            ServerMessage::Heartbeat {
                ts,
                server_ts: now_millis(),
            },
        );
        Ok(())
    }
}
