//! Fixed-window rate limiting keyed by (connection, action).
//!
//! A window resets once more than `window` has elapsed since it opened, so a
//! client can land up to twice the limit across a window boundary. That is
//! the accepted cost of the fixed-window policy.

use crate::types::ConnectionId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
    Shoot,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Move => "move",
            ActionKind::Shoot => "shoot",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RatePolicy {
    pub limit: u32,
    pub window: Duration,
}

impl RatePolicy {
    pub fn new(limit: u32, window_ms: u64) -> Self {
        Self {
            limit,
            window: Duration::from_millis(window_ms),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RateWindow {
    pub count: u32,
    pub window_start: Instant,
}

#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: HashMap<(ConnectionId, ActionKind), RateWindow>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(
        &mut self,
        connection: ConnectionId,
        action: ActionKind,
        policy: RatePolicy,
    ) -> bool {
        self.allow_at(connection, action, policy, Instant::now())
    }

    pub fn allow_at(
        &mut self,
        connection: ConnectionId,
        action: ActionKind,
        policy: RatePolicy,
        now: Instant,
    ) -> bool {
        let window = self
            .windows
            .entry((connection, action))
            .or_insert_with(|| RateWindow {
                count: 0,
                window_start: now,
            });

        if now.saturating_duration_since(window.window_start) > policy.window {
            window.count = 0;
            window.window_start = now;
        }

        window.count = window.count.saturating_add(1);

        if window.count > policy.limit {
            log::debug!(
                "Rate limited {} on {}: {} in window (limit {})",
                connection,
                action.as_str(),
                window.count,
                policy.limit
            );
            return false;
        }

        true
    }

    /// Drops every window belonging to `connection`.
    pub fn purge(&mut self, connection: ConnectionId) {
        self.windows.retain(|(conn, _), _| *conn != connection);
    }

    pub fn window(&self, connection: ConnectionId, action: ActionKind) -> Option<&RateWindow> {
        self.windows.get(&(connection, action))
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(limit: u32) -> RatePolicy {
        RatePolicy::new(limit, 60_000)
    }

    #[test]
    fn test_allows_up_to_limit() {
        let mut limiter = RateLimiter::new();
        let conn = ConnectionId::new();
        let now = Instant::now();

        for _ in 0..10 {
            assert!(limiter.allow_at(conn, ActionKind::Shoot, policy(10), now));
        }
        assert!(!limiter.allow_at(conn, ActionKind::Shoot, policy(10), now));
        assert_eq!(limiter.window(conn, ActionKind::Shoot).unwrap().count, 11);
    }

    #[test]
    fn test_window_resets_only_after_window_elapsed() {
        let mut limiter = RateLimiter::new();
        let conn = ConnectionId::new();
        let start = Instant::now();
        let p = policy(1);

        assert!(limiter.allow_at(conn, ActionKind::Move, p, start));
        // Exactly at the window edge the window is still open.
        assert!(!limiter.allow_at(conn, ActionKind::Move, p, start + p.window));
        let reopened = start + p.window + Duration::from_millis(1);
        assert!(limiter.allow_at(conn, ActionKind::Move, p, reopened));
    }

    #[test]
    fn test_double_burst_across_boundary() {
        let mut limiter = RateLimiter::new();
        let conn = ConnectionId::new();
        let start = Instant::now();
        let p = policy(10);

        let late = start + Duration::from_millis(59_999);
        let mut admitted = 0;
        assert!(limiter.allow_at(conn, ActionKind::Shoot, p, start));
        admitted += 1;
        for _ in 0..9 {
            if limiter.allow_at(conn, ActionKind::Shoot, p, late) {
                admitted += 1;
            }
        }
        let next = start + Duration::from_millis(60_001);
        for _ in 0..10 {
            if limiter.allow_at(conn, ActionKind::Shoot, p, next) {
                admitted += 1;
            }
        }
        // 19 of these land within 2ms of the boundary.
        assert_eq!(admitted, 20);
    }

    #[test]
    fn test_actions_and_connections_are_independent() {
        let mut limiter = RateLimiter::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        let now = Instant::now();

        assert!(limiter.allow_at(a, ActionKind::Shoot, policy(1), now));
        assert!(!limiter.allow_at(a, ActionKind::Shoot, policy(1), now));
        assert!(limiter.allow_at(a, ActionKind::Move, policy(1), now));
        assert!(limiter.allow_at(b, ActionKind::Shoot, policy(1), now));
    }

    #[test]
    fn test_purge_removes_only_that_connection() {
        let mut limiter = RateLimiter::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();

        limiter.allow(a, ActionKind::Move, policy(5));
        limiter.allow(a, ActionKind::Shoot, policy(5));
        limiter.allow(b, ActionKind::Move, policy(5));
        assert_eq!(limiter.len(), 3);

        limiter.purge(a);
        assert_eq!(limiter.len(), 1);
        assert!(limiter.window(a, ActionKind::Move).is_none());
        assert!(limiter.window(b, ActionKind::Move).is_some());
    }
}
