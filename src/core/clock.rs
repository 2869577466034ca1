// `std::time::SystemTime::now()` panics on `wasm32-unknown-unknown`. `web-time`
// provides the same API backed by the browser's `Date.now()`.
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Wall-clock milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// A clock frozen at one instant, for deterministic ids in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

/// Line-item ids: the current timestamp in milliseconds, bumped past the last
/// id handed out so that two additions in the same tick still differ.
#[derive(Debug)]
pub struct LineIdGenerator<C: Clock> {
    clock: C,
    last: u64,
}

impl<C: Clock> LineIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, last: 0 }
    }

    /// Never hand out an id at or below `id`. Called with ids loaded from
    /// storage so a skewed clock can't reissue one of them.
    pub fn observe(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.last = self.last.max(n);
        }
    }

    pub fn next_id(&mut self) -> String {
        let now = self.clock.now_millis();
        self.last = now.max(self.last.saturating_add(1));
        self.last.to_string()
    }
}
