//! Session relay for a single global multiplayer lobby.
//!
//! Clients open a websocket, `join`, and from then on their movement,
//! shooting and health events are validated, rate limited and fanned out to
//! the rest of the lobby.

pub mod actor_system;
pub mod anticheat;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lobby;
pub mod network;
pub mod player;
pub mod types;
