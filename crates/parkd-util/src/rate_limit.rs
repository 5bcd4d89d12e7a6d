//! Per-client request throttling for the IPC surface

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::ClientId;

/// Fixed-window request limiter keyed by client.
///
/// Each client may issue `max_requests` within a window of length `window`;
/// the window restarts on the first request after it has elapsed.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: HashMap<ClientId, Window>,
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    used: u32,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: HashMap::new(),
        }
    }

    /// Record a request from `client_id`. Returns `false` if it should be rejected.
    pub fn check(&mut self, client_id: &ClientId) -> bool {
        self.check_at(client_id, Instant::now())
    }

    /// Same as [`RateLimiter::check`] with an explicit clock reading.
    pub fn check_at(&mut self, client_id: &ClientId, now: Instant) -> bool {
        let window = self.clients.entry(client_id.clone()).or_insert(Window {
            opened_at: now,
            used: 0,
        });

        if now.saturating_duration_since(window.opened_at) >= self.window {
            window.opened_at = now;
            window.used = 0;
        }

        if window.used < self.max_requests {
            window.used += 1;
            true
        } else {
            false
        }
    }

    /// Forget a client, e.g. on disconnect
    pub fn remove_client(&mut self, client_id: &ClientId) {
        self.clients.remove(client_id);
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_after_limit_within_window() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(1));
        let client = ClientId::new();
        let t0 = Instant::now();

        assert!(limiter.check_at(&client, t0));
        assert!(limiter.check_at(&client, t0));
        assert!(limiter.check_at(&client, t0));
        assert!(!limiter.check_at(&client, t0 + Duration::from_millis(500)));

        // New window
        assert!(limiter.check_at(&client, t0 + Duration::from_secs(1)));
    }

    #[test]
    fn clients_are_independent() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(1));
        let a = ClientId::new();
        let b = ClientId::new();
        let t0 = Instant::now();

        assert!(limiter.check_at(&a, t0));
        assert!(!limiter.check_at(&a, t0));
        assert!(limiter.check_at(&b, t0));

        limiter.remove_client(&a);
        assert_eq!(limiter.tracked_clients(), 1);
        assert!(limiter.check_at(&a, t0));
    }
}
