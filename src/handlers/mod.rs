mod status;
mod websocket;

pub use status::{handle_players, handle_status};
pub use websocket::handle_connection;

use crate::actor_system::ActorRef;
use crate::lobby::LobbyActor;
use warp::{Filter, Rejection, Reply};

/// `GET /game` (websocket), `GET /api/status`, `GET /debug/players`.
pub fn routes(
    lobby: ActorRef<LobbyActor>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let lobby_filter = warp::any().map(move || lobby.clone());

    let game_route = warp::path("game")
        .and(warp::path::end())
        .and(warp::ws())
        .and(lobby_filter.clone())
        .map(|ws: warp::ws::Ws, lobby: ActorRef<LobbyActor>| {
            ws.on_upgrade(move |websocket| handle_connection(websocket, lobby))
        });

    let status_route = warp::path!("api" / "status")
        .and(warp::get())
        .and(lobby_filter.clone())
        .and_then(handle_status);

    let players_route = warp::path!("debug" / "players")
        .and(warp::get())
        .and(lobby_filter)
        .and_then(handle_players);

    game_route.or(status_route).or(players_route)
}
