use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::core::config::RateLimitConfig;

/// Prune expired windows once the table grows past this many clients,
/// at most once per window length
const PRUNE_THRESHOLD: usize = 1024;

/// Outcome of counting one request against a client's window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

struct Windows {
    by_client: HashMap<String, Window>,
    last_pruned: Instant,
}

/// Fixed-window limiter held in process memory
pub struct RateLimitService {
    window: Duration,
    max_requests: u32,
    windows: Mutex<Windows>,
}

impl RateLimitService {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: config.window,
            max_requests: config.max_requests,
            windows: Mutex::new(Windows {
                by_client: HashMap::new(),
                last_pruned: Instant::now(),
            }),
        }
    }

    /// Count a request for `client` now
    pub fn check(&self, client: &str) -> RateLimitDecision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> RateLimitDecision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if windows.by_client.len() >= PRUNE_THRESHOLD
            && now.duration_since(windows.last_pruned) >= self.window
        {
            let window = self.window;
            windows
                .by_client
                .retain(|_, w| now.duration_since(w.started_at) < window);
            windows.last_pruned = now;
        }

        let entry = windows.by_client.entry(client.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(entry.started_at) >= self.window {
            *entry = Window {
                started_at: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            let elapsed = now.duration_since(entry.started_at);
            return RateLimitDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        entry.count += 1;
        RateLimitDecision::Allowed
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .by_client
            .len()
    }
}
