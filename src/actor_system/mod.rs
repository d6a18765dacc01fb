//! Minimal actor layer the lobby runs on.
//!
//! Each actor owns its state and drains a single mailbox, so handlers never
//! overlap. `tell` is fire-and-forget, `ask` waits for the handler's return
//! value. The system carries a broadcast bus for `LobbyEvent`s.

mod actor;
mod bus;
mod system;

pub use actor::{Actor, ActorContext, ActorError, ActorRef, Handler, Message};

pub use bus::EventBus;
pub use system::ActorSystem;

pub use async_trait::async_trait;
