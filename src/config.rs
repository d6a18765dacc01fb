use crate::anticheat::RatePolicy;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub move_limit: RatePolicy,
    pub shoot_limit: RatePolicy,
    /// 0 means the lobby is unbounded.
    pub max_players: usize,
    pub population_log_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            move_limit: RatePolicy::new(120, 60_000),
            shoot_limit: RatePolicy::new(10, 60_000),
            max_players: 0,
            population_log_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = parse_var("PORT") {
            config.port = port;
        }

        if let Some(limit) = parse_var("MOVE_RATE_LIMIT") {
            config.move_limit.limit = limit;
        }

        if let Some(window) = parse_var("MOVE_RATE_WINDOW_MS") {
            config.move_limit = RatePolicy::new(config.move_limit.limit, window);
        }

        if let Some(limit) = parse_var("SHOOT_RATE_LIMIT") {
            config.shoot_limit.limit = limit;
        }

        if let Some(window) = parse_var("SHOOT_RATE_WINDOW_MS") {
            config.shoot_limit = RatePolicy::new(config.shoot_limit.limit, window);
        }

        if let Some(max) = parse_var("MAX_PLAYERS") {
            config.max_players = max;
        }

        if let Some(secs) = parse_var::<u64>("POPULATION_LOG_SECS") {
            config.population_log_secs = secs.max(1);
        }

        config
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
