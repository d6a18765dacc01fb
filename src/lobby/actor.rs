use crate::actor_system::{
    Actor, ActorContext, ActorError, ActorRef, ActorSystem, Handler, async_trait,
};
use crate::config::ServerConfig;
use crate::lobby::RelayCore;
use crate::lobby::messages::{Connect, Disconnect, GetPlayers, GetStatus, Inbound};
use crate::network::{ConnectionManager, Outbox};
use crate::player::Player;
use crate::types::LobbyStatus;
use std::time::Instant;

pub const LOBBY_ACTOR: &str = "lobby";

/// Owns the relay state. Its mailbox is the single queue every connection's
/// events pass through, so handlers never run concurrently.
pub struct LobbyActor {
    core: RelayCore,
    connections: ConnectionManager,
    started_at: Instant,
}

impl LobbyActor {
    pub fn new(config: &ServerConfig, connections: ConnectionManager) -> Self {
        Self {
            core: RelayCore::new(config),
            connections,
            started_at: Instant::now(),
        }
    }

    fn flush(&self, mut outbox: Outbox, ctx: &ActorContext) {
        let events = outbox.take_events();
        outbox.deliver(&self.connections);
        for event in events {
            ctx.system.publish(event);
        }
    }
}

pub async fn spawn_lobby(
    system: &ActorSystem,
    config: &ServerConfig,
    connections: ConnectionManager,
) -> Result<ActorRef<LobbyActor>, ActorError> {
    system
        .create_actor(LOBBY_ACTOR, LobbyActor::new(config, connections))
        .await
}

#[async_trait]
impl Actor for LobbyActor {
    async fn pre_start(&mut self, ctx: &mut ActorContext) -> Result<(), ActorError> {
        log::info!("Lobby '{}' open", ctx.name);
        Ok(())
    }

    async fn post_stop(&mut self, ctx: &mut ActorContext) {
        log::info!(
            "Lobby '{}' closed with {} players",
            ctx.name,
            self.core.population()
        );
    }
}

#[async_trait]
impl Handler<Connect> for LobbyActor {
    async fn handle(&mut self, msg: Connect, _ctx: &mut ActorContext) {
        self.connections.add(msg.connection, msg.sender);
        self.core.connect(msg.connection);
    }
}

#[async_trait]
impl Handler<Inbound> for LobbyActor {
    async fn handle(&mut self, msg: Inbound, ctx: &mut ActorContext) {
        let outbox = self.core.handle_frame(msg.connection, &msg.text);
        self.flush(outbox, ctx);
    }
}

#[async_trait]
impl Handler<Disconnect> for LobbyActor {
    async fn handle(&mut self, msg: Disconnect, ctx: &mut ActorContext) {
        self.connections.remove(&msg.connection);
        let outbox = self.core.disconnect(msg.connection);
        self.flush(outbox, ctx);
    }
}

#[async_trait]
impl Handler<GetStatus> for LobbyActor {
    async fn handle(&mut self, _msg: GetStatus, _ctx: &mut ActorContext) -> LobbyStatus {
        LobbyStatus {
            status: "online",
            total_players: self.core.population(),
            connections: self.core.connection_count(),
            uptime: self.started_at.elapsed().as_secs(),
        }
    }
}

#[async_trait]
impl Handler<GetPlayers> for LobbyActor {
    async fn handle(&mut self, _msg: GetPlayers, _ctx: &mut ActorContext) -> Vec<Player> {
        self.core.players()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_system::EventBus;
    use crate::types::{ConnectionId, LobbyEvent};
    use tokio::sync::mpsc;

    async fn lobby() -> (ActorSystem, ActorRef<LobbyActor>) {
        let system = ActorSystem::new("test", EventBus::new(64));
        let lobby = spawn_lobby(&system, &ServerConfig::default(), ConnectionManager::new())
            .await
            .unwrap();
        (system, lobby)
    }

    fn frame(msg: &warp::ws::Message) -> serde_json::Value {
        serde_json::from_str(msg.to_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_join_and_leave_through_mailbox() {
        let (system, lobby) = lobby().await;
        let mut events = system.events();

        let a = ConnectionId::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        lobby.tell(Connect { connection: a, sender: tx_a }).unwrap();
        lobby
            .tell(Inbound {
                connection: a,
                text: r#"{"type":"join","playerName":"Ann"}"#.to_string(),
            })
            .unwrap();

        let status = lobby.ask(GetStatus).await.unwrap();
        assert_eq!(status.total_players, 1);
        assert_eq!(status.connections, 1);

        assert_eq!(frame(&rx_a.recv().await.unwrap())["type"], "joinedGame");
        assert_eq!(frame(&rx_a.recv().await.unwrap())["type"], "playerJoined");
        assert!(matches!(
            events.recv().await.unwrap(),
            LobbyEvent::PlayerJoined { population: 1, .. }
        ));

        let players = lobby.ask(GetPlayers).await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Ann");

        lobby.tell(Disconnect { connection: a }).unwrap();
        let status = lobby.ask(GetStatus).await.unwrap();
        assert_eq!(status.total_players, 0);
        assert_eq!(status.connections, 0);
        assert!(matches!(
            events.recv().await.unwrap(),
            LobbyEvent::PlayerLeft { population: 0, .. }
        ));
    }

    #[tokio::test]
    async fn test_frames_are_handled_in_order() {
        let (_system, lobby) = lobby().await;

        let a = ConnectionId::new();
        let b = ConnectionId::new();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        lobby.tell(Connect { connection: a, sender: tx_a }).unwrap();
        lobby.tell(Connect { connection: b, sender: tx_b }).unwrap();

        for conn in [a, b] {
            lobby
                .tell(Inbound {
                    connection: conn,
                    text: r#"{"type":"join"}"#.to_string(),
                })
                .unwrap();
        }
        for x in 1..=5 {
            let text = format!(
                r#"{{"type":"move","position":{{"x":{},"y":0,"z":0}},"rotation":{{"x":0,"y":0,"z":0}}}}"#,
                x
            );
            lobby.tell(Inbound { connection: a, text }).unwrap();
        }
        lobby.ask(GetStatus).await.unwrap();

        let mut xs = Vec::new();
        while let Ok(msg) = rx_b.try_recv() {
            let value = frame(&msg);
            if value["type"] == "playerMoved" {
                xs.push(value["position"]["x"].as_f64().unwrap());
            }
        }
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
