mod broadcast;
mod connection;

pub use broadcast::{Outbox, watch_population};
pub use connection::ConnectionManager;
