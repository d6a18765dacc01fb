use crate::actor_system::ActorRef;
use crate::lobby::{Connect, Disconnect, Inbound, LobbyActor};
use crate::types::ConnectionId;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use warp::ws::WebSocket;

/// Pumps one websocket: frames go to the lobby in arrival order, replies
/// come back through an unbounded channel drained by a writer task.
pub async fn handle_connection(websocket: WebSocket, lobby: ActorRef<LobbyActor>) {
    let connection = ConnectionId::new();
    let (mut ws_tx, mut ws_rx) = websocket.split();
    let (sender, receiver) = mpsc::unbounded_channel();
    let mut receiver_stream = UnboundedReceiverStream::new(receiver);

    if lobby.tell(Connect { connection, sender }).is_err() {
        log::error!("Lobby unavailable, dropping connection {}", connection);
        return;
    }

    log::debug!("WebSocket connected - {}", connection);

    tokio::spawn(async move {
        while let Some(msg) = receiver_stream.next().await {
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                if msg.is_close() {
                    break;
                }
                let Ok(text) = msg.to_str() else {
                    continue;
                };
                let inbound = Inbound {
                    connection,
                    text: text.to_string(),
                };
                if lobby.tell(inbound).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::debug!("WebSocket error on {}: {}", connection, e);
                break;
            }
        }
    }

    log::debug!("WebSocket disconnected - {}", connection);
    let _ = lobby.tell(Disconnect { connection });
}
