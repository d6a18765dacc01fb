use crate::actor_system::Message;
use crate::player::Player;
use crate::types::{ConnectionId, LobbyStatus};
use tokio::sync::mpsc;
use warp::ws::Message as WsMessage;

/// A websocket opened; `sender` feeds its writer task.
#[derive(Debug)]
pub struct Connect {
    pub connection: ConnectionId,
    pub sender: mpsc::UnboundedSender<WsMessage>,
}

impl Message for Connect {
    type Response = ();
}

/// One text frame, in the order the socket delivered it.
#[derive(Clone, Debug)]
pub struct Inbound {
    pub connection: ConnectionId,
    pub text: String,
}

impl Message for Inbound {
    type Response = ();
}

#[derive(Clone, Debug)]
pub struct Disconnect {
    pub connection: ConnectionId,
}

impl Message for Disconnect {
    type Response = ();
}

#[derive(Clone, Debug)]
pub struct GetStatus;

impl Message for GetStatus {
    type Response = LobbyStatus;
}

#[derive(Clone, Debug)]
pub struct GetPlayers;

impl Message for GetPlayers {
    type Response = Vec<Player>;
}
