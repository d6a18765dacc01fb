use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const WORLD_BOUNDS: f64 = 1000.0;
pub const MAX_HEALTH: u32 = 100;
pub const DEFAULT_HIT_DAMAGE: f64 = 25.0;
pub const MAX_NAME_UNITS: usize = 20;
pub const IDENTITY_LEN: usize = 16;

/// Transport-level connection id, one per websocket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short prefix used to build default display names.
    pub fn short(&self) -> String {
        self.0.simple().to_string().chars().take(4).collect()
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-issued player identity, stable for the connection's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

/// Frames accepted from a client.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Join {
        #[serde(default)]
        player_name: Option<serde_json::Value>,
    },
    Move {
        position: Position,
        rotation: Position,
    },
    Shoot {
        position: Position,
        direction: Position,
    },
    #[serde(rename_all = "camelCase")]
    Hit {
        #[serde(default)]
        damage: Option<serde_json::Value>,
        #[serde(default)]
        shooter_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Death {
        #[serde(default)]
        killer_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Score {
        #[serde(default)]
        score_type: Option<String>,
        #[serde(default)]
        points: Option<serde_json::Number>,
        #[serde(default)]
        target_name: Option<String>,
    },
    Heartbeat {
        #[serde(default)]
        ts: Option<serde_json::Number>,
    },
}

impl ClientMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "join",
            ClientMessage::Move { .. } => "move",
            ClientMessage::Shoot { .. } => "shoot",
            ClientMessage::Hit { .. } => "hit",
            ClientMessage::Death { .. } => "death",
            ClientMessage::Score { .. } => "score",
            ClientMessage::Heartbeat { .. } => "heartbeat",
        }
    }
}

/// Frames sent to a client.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    JoinedGame {
        player_id: PlayerId,
        player_name: String,
        players_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        player_id: PlayerId,
        player_name: String,
        position: Position,
        players_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    PlayerMoved {
        player_id: PlayerId,
        position: Position,
        rotation: Position,
        timestamp: i64,
    },
    #[serde(rename_all = "camelCase")]
    PlayerShot {
        player_id: PlayerId,
        position: Position,
        direction: Position,
        timestamp: i64,
    },
    #[serde(rename_all = "camelCase")]
    PlayerWasHit {
        player_id: PlayerId,
        damage: f64,
        health: u32,
        shooter_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    PlayerDied {
        player_id: PlayerId,
        killer_id: Option<String>,
        timestamp: i64,
    },
    #[serde(rename_all = "camelCase")]
    PlayerScored {
        player_id: PlayerId,
        player_name: String,
        score_type: Option<String>,
        points: Option<serde_json::Number>,
        target_name: Option<String>,
        timestamp: i64,
    },
    #[serde(rename_all = "camelCase")]
    Heartbeat {
        ts: Option<serde_json::Number>,
        server_ts: i64,
    },
    #[serde(rename_all = "camelCase")]
    PlayerLeft {
        player_id: PlayerId,
        players_count: usize,
    },
    Error {
        message: String,
    },
}

/// Lobby lifecycle notifications published on the actor system bus.
#[derive(Clone, Debug)]
pub enum LobbyEvent {
    PlayerJoined {
        player_id: PlayerId,
        name: String,
        population: usize,
    },
    PlayerLeft {
        player_id: PlayerId,
        population: usize,
    },
}

/// Read-only view of the lobby for status queries.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyStatus {
    pub status: &'static str,
    pub total_players: usize,
    pub connections: usize,
    pub uptime: u64,
}
