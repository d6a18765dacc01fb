use crate::types::{MAX_HEALTH, PlayerId, Position};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub health: u32,
    pub alive: bool,
    pub joined_at: DateTime<Utc>,
}

impl Player {
    pub fn new(player_id: PlayerId, name: String) -> Self {
        Self {
            player_id,
            name,
            position: Position::default(),
            health: MAX_HEALTH,
            alive: true,
            joined_at: Utc::now(),
        }
    }

    pub fn move_to(&mut self, position: Position) {
        self.position = position;
    }

    /// Applies client-reported damage. Health only goes down and floors at 0;
    /// a negative amount leaves it untouched.
    pub fn apply_damage(&mut self, damage: f64) -> u32 {
        let remaining = (f64::from(self.health) - damage.max(0.0)).round();
        self.health = remaining.clamp(0.0, f64::from(self.health)) as u32;
        if self.health == 0 {
            self.alive = false;
        }
        self.health
    }

    pub fn kill(&mut self) {
        self.health = 0;
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(PlayerId::from("p1".to_string()), "Ann".to_string())
    }

    #[test]
    fn test_new_player_defaults() {
        let p = player();
        assert_eq!(p.health, MAX_HEALTH);
        assert!(p.alive);
        assert_eq!(p.position, Position::default());
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut p = player();
        assert_eq!(p.apply_damage(30.0), 70);
        assert_eq!(p.apply_damage(30.0), 40);
        assert_eq!(p.apply_damage(30.0), 10);
        assert!(p.alive);
        assert_eq!(p.apply_damage(30.0), 0);
        assert!(!p.alive);
        assert_eq!(p.apply_damage(30.0), 0);
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut p = player();
        p.apply_damage(50.0);
        assert_eq!(p.apply_damage(-40.0), 50);
    }

    #[test]
    fn test_kill() {
        let mut p = player();
        p.kill();
        assert_eq!(p.health, 0);
        assert!(!p.alive);
    }
}
