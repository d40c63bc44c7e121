//! A fixed-interval tick source.
//!
//! [`FixedTimer`] tracks the next deadline of a repeating timer. The caller decides how to wait;
//! the timer only answers whether a tick is due and how long is left until the next one.

use std::time::{Duration, Instant};

/// Shortest interval a timer accepts.
pub const MIN_INTERVAL: Duration = Duration::from_nanos(1);

#[derive(Debug, Clone)]
pub struct FixedTimer {
    interval: Duration,
    next: Instant,
}

impl FixedTimer {
    /// Creates a timer whose first tick is due one interval after `start`.
    ///
    /// A zero `interval` is clamped to [`MIN_INTERVAL`].
    pub fn new(interval: Duration, start: Instant) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next tick, zero if it is already due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// If a tick is due at `now`, re-arms the timer and returns `true`.
    ///
    /// Deadlines advance by whole intervals from the previous deadline so the cadence does not
    /// drift. If the caller fell more than one interval behind, the missed ticks are dropped and
    /// the next deadline is placed in the future.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            let behind = now.duration_since(self.next).as_nanos();
            let interval = self.interval.as_nanos();
            log::trace!("Timer skipped {} ticks", behind / interval + 1);
            self.next = now + Duration::from_nanos((interval - behind % interval) as u64);
        }
        true
    }
}
