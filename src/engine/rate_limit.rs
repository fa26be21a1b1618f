use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-pattern retrigger throttling.
///
/// Owns the map of last-trigger timestamps explicitly (instead of
/// process-wide static state) and is consulted by the mixer before a
/// trigger is accepted. Rapid-fire events - shield hits every few
/// milliseconds - collapse into one effect per interval.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_trigger: HashMap<String, Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_trigger: HashMap::new(),
        }
    }

    /// Returns true when a trigger for `name` is allowed now, recording the
    /// attempt if so.
    pub fn allow(&mut self, name: &str) -> bool {
        let now = Instant::now();
        match self.last_trigger.get(name) {
            Some(&last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_trigger.insert(name.to_string(), now);
                true
            }
        }
    }

    /// Drop all recorded history (used by reinitialize).
    pub fn reset(&mut self) {
        self.last_trigger.clear();
    }
}
