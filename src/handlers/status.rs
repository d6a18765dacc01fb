use crate::actor_system::ActorRef;
use crate::lobby::{GetPlayers, GetStatus, LobbyActor};
use warp::{Rejection, Reply, reject, reply};

pub async fn handle_status(lobby: ActorRef<LobbyActor>) -> Result<impl Reply, Rejection> {
    let status = lobby.ask(GetStatus).await.map_err(|e| {
        log::error!("Status query failed: {}", e);
        reject::reject()
    })?;
    Ok(reply::json(&status))
}

pub async fn handle_players(lobby: ActorRef<LobbyActor>) -> Result<impl Reply, Rejection> {
    let players = lobby.ask(GetPlayers).await.map_err(|e| {
        log::error!("Player listing failed: {}", e);
        reject::reject()
    })?;
    Ok(reply::json(&serde_json::json!({
        "count": players.len(),
        "players": players,
    })))
}
