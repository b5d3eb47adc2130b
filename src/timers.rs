//! Cancellable interval timers on a virtual clock.
//!
//! The scheduler never looks at wall time: the owner feeds it frame deltas
//! through [`Scheduler::advance`] and gets back the firings that fell inside
//! that window, oldest first.

use std::time::Duration;

use crate::error::{GameError, Result};

/// Which periodic job a timer drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Spawn,
    Elapsed,
    SpeedRamp,
    Score,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Debug)]
struct Interval {
    handle: TimerHandle,
    kind: TimerKind,
    period: Duration,
    next_due: Duration,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    intervals: Vec<Interval>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Register a repeating timer whose first firing is one `period` from now.
    pub fn every(&mut self, kind: TimerKind, period: Duration) -> Result<TimerHandle> {
        if period.is_zero() {
            return Err(GameError::InvalidConfig(format!(
                "{kind:?} timer period must be non-zero"
            )));
        }
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.intervals.push(Interval {
            handle,
            kind,
            period,
            next_due: self.now + period,
        });
        log::trace!("timer {kind:?} every {period:?} registered as {handle:?}");
        Ok(handle)
    }

    /// Unknown or already-cancelled handles are ignored.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.intervals.retain(|i| i.handle != handle);
    }

    pub fn cancel_all(&mut self) {
        self.intervals.clear();
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.intervals.iter().any(|i| i.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.intervals.len()
    }

    /// Move the clock forward by `dt` and return every firing in order.
    /// Simultaneous firings come out in registration order.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerKind> {
        let target = self.now + dt;
        let mut fired = Vec::new();

        loop {
            // Registration order is preserved in `intervals`, so the first
            // minimum wins ties.
            let next = self
                .intervals
                .iter_mut()
                .filter(|i| i.next_due <= target)
                .min_by_key(|i| i.next_due);
            let Some(interval) = next else { break };

            self.now = interval.next_due;
            interval.next_due += interval.period;
            fired.push(interval.kind);
        }

        self.now = target;
        fired
    }
}
