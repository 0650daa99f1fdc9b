//! Sliding-window rate limiting

use crate::clock::{Clock, SystemClock};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// Admits at most `max_calls` operations in any trailing `period`
///
/// The window is a queue of admitted-call instants behind one mutex. Pruning,
/// the capacity check and the append happen under a single lock acquisition,
/// so concurrent callers never lose or double-count a slot.
///
/// A recorded instant is evicted once its age reaches `period`: an entry
/// exactly `period` old no longer occupies a slot.
#[derive(Debug)]
pub struct RateLimiter<C: Clock = SystemClock> {
    max_calls: usize,
    period: Duration,
    window: Mutex<VecDeque<Instant>>,
    clock: C,
}

impl RateLimiter<SystemClock> {
    /// Create a limiter on the system clock
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self::with_clock(max_calls, period, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Create a limiter on an explicit clock
    pub fn with_clock(max_calls: usize, period: Duration, clock: C) -> Self {
        Self {
            max_calls,
            period,
            // Grows on demand; max_calls comes from user config and may be huge
            window: Mutex::new(VecDeque::new()),
            clock,
        }
    }

    /// Maximum admissions per window
    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    /// Window length
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Try to take a slot; returns false when the window is full
    pub fn try_acquire(&self) -> bool {
        let mut window = self.lock_window();
        let now = self.clock.now();
        self.prune(&mut window, now);

        if window.len() >= self.max_calls {
            debug!(
                "Rate limit reached ({} calls in {:?})",
                window.len(),
                self.period
            );
            return false;
        }

        window.push_back(now);
        true
    }

    /// Slots still available in the current window
    pub fn remaining_capacity(&self) -> usize {
        let mut window = self.lock_window();
        let now = self.clock.now();
        self.prune(&mut window, now);
        self.max_calls.saturating_sub(window.len())
    }

    fn prune(&self, window: &mut VecDeque<Instant>, now: Instant) {
        // Instants are pushed in order, so expired entries sit at the front
        while let Some(&oldest) = window.front() {
            if now.saturating_duration_since(oldest) < self.period {
                break;
            }
            window.pop_front();
        }
    }

    fn lock_window(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        // The queue is always left consistent, so a poisoned lock is usable
        self.window.lock().unwrap_or_else(|p| p.into_inner())
    }
}
