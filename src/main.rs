use lobby_relay::actor_system::{ActorSystem, EventBus};
use lobby_relay::config::ServerConfig;
use lobby_relay::handlers;
use lobby_relay::lobby::spawn_lobby;
use lobby_relay::network::{ConnectionManager, watch_population};
use std::time::Duration;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ServerConfig::from_env();
    log::debug!("{:?}", config);

    let system = ActorSystem::new("relay", EventBus::new(1000));
    let connection_manager = ConnectionManager::new();
    let lobby = spawn_lobby(&system, &config, connection_manager.clone()).await?;

    let watch_system = system.clone();
    let watch_manager = connection_manager.clone();
    let every = Duration::from_secs(config.population_log_secs);
    tokio::spawn(async move {
        watch_population(watch_system, watch_manager, every).await;
    });

    let routes = handlers::routes(lobby).with(warp::log("lobby-relay"));

    log::info!("Lobby relay starting on port {}", config.port);
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;
    Ok(())
}
