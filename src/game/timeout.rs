//! Idle-timeout policy: ending episodes that go too long without food

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Legacy wall-clock allowance between two meals
pub const DEFAULT_TIMEOUT_SECS: f64 = 3.0;

/// Default allowance for the tick-counting policy
pub const DEFAULT_IDLE_TICKS: u32 = 300;

/// How long a snake may go without eating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdleTimeout {
    /// Expire once more than `limit` ticks have passed since the last meal
    Ticks { limit: u32 },
    /// Expire once more than `seconds` of clock time have passed since the last meal
    WallClock { seconds: f64 },
}

impl Default for IdleTimeout {
    fn default() -> Self {
        IdleTimeout::Ticks {
            limit: DEFAULT_IDLE_TICKS,
        }
    }
}

/// Monotonic time source for the wall-clock policy
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Real monotonic time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same offset, so a test can keep a handle and advance the
/// clock a simulation owns.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_micros: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_micros
            .fetch_add(by.as_micros() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_micros(self.offset_micros.load(Ordering::SeqCst))
    }
}

/// Per-episode bookkeeping for an [`IdleTimeout`]
#[derive(Debug, Clone)]
pub(crate) enum IdleTracker {
    Ticks { idle: u32, limit: u32 },
    WallClock { last_food: Instant, timeout: Duration },
}

impl IdleTracker {
    pub(crate) fn new(policy: IdleTimeout, now: Instant) -> Self {
        match policy {
            IdleTimeout::Ticks { limit } => IdleTracker::Ticks { idle: 0, limit },
            IdleTimeout::WallClock { seconds } => IdleTracker::WallClock {
                last_food: now,
                // Validated configs always convert; anything else never expires
                timeout: Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX),
            },
        }
    }

    /// Reset the allowance after a meal
    pub(crate) fn fed(&mut self, now: Instant) {
        match self {
            IdleTracker::Ticks { idle, .. } => *idle = 0,
            IdleTracker::WallClock { last_food, .. } => *last_food = now,
        }
    }

    /// Count one tick without food
    pub(crate) fn tick(&mut self) {
        if let IdleTracker::Ticks { idle, .. } = self {
            *idle = idle.saturating_add(1);
        }
    }

    pub(crate) fn expired(&self, now: Instant) -> bool {
        match self {
            IdleTracker::Ticks { idle, limit } => idle > limit,
            IdleTracker::WallClock { last_food, timeout } => {
                now.saturating_duration_since(*last_food) > *timeout
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_tracker_expires_after_limit() {
        let clock = ManualClock::new();
        let mut tracker = IdleTracker::new(IdleTimeout::Ticks { limit: 2 }, clock.now());

        tracker.tick();
        tracker.tick();
        assert!(!tracker.expired(clock.now()));

        tracker.tick();
        assert!(tracker.expired(clock.now()));

        tracker.fed(clock.now());
        assert!(!tracker.expired(clock.now()));
    }

    #[test]
    fn test_wall_clock_tracker() {
        let clock = ManualClock::new();
        let mut tracker =
            IdleTracker::new(IdleTimeout::WallClock { seconds: 3.0 }, clock.now());

        clock.advance(Duration::from_secs(3));
        assert!(!tracker.expired(clock.now()));

        clock.advance(Duration::from_millis(1));
        assert!(tracker.expired(clock.now()));

        tracker.fed(clock.now());
        assert!(!tracker.expired(clock.now()));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let before = clock.now();

        handle.advance(Duration::from_secs(5));
        assert_eq!(clock.now() - before, Duration::from_secs(5));
    }

    #[test]
    fn test_default_policy_counts_ticks() {
        assert_eq!(
            IdleTimeout::default(),
            IdleTimeout::Ticks {
                limit: DEFAULT_IDLE_TICKS
            }
        );
    }
}
