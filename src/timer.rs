//! Cooperative repeating timers.
//!
//! The gallery never sleeps or spawns threads. The host passes a monotonic
//! clock reading (time since mount) into [`TimerQueue::advance`], and every
//! timer that came due since the last call fires once, in due-time order.
//! A late call does not replay the intervals it missed. Cancelling a timer removes it from the queue, so a
//! cancelled timer can never fire again.

use std::collections::BTreeMap;
use std::time::Duration;

/// Shortest interval a timer may have; zero intervals would fire forever.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    interval: Duration,
    due: Duration,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    timers: BTreeMap<TimerId, Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer that first fires at `now + interval`, then every `interval`.
    pub fn schedule_repeating(&mut self, now: Duration, interval: Duration) -> TimerId {
        let interval = interval.max(MIN_INTERVAL);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            Timer {
                interval,
                due: now + interval,
            },
        );
        id
    }

    /// Remove a timer. Returns whether it was still scheduled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Number of live timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Fire every timer due at or before `now`, each at most once.
    ///
    /// A timer that missed several intervals is rescheduled to the first
    /// interval boundary after `now`.
    pub fn advance(&mut self, now: Duration) -> Vec<TimerId> {
        let mut fired: Vec<(Duration, TimerId)> = Vec::new();
        for (id, timer) in self.timers.iter_mut() {
            if timer.due <= now {
                fired.push((timer.due, *id));
                timer.due = next_boundary(timer.due, timer.interval, now);
            }
        }
        fired.sort();
        fired.into_iter().map(|(_, id)| id).collect()
    }
}

/// First `due + k * interval` (k >= 1) strictly after `now`, for `due <= now`.
fn next_boundary(due: Duration, interval: Duration, now: Duration) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let step = interval.as_nanos();
    let missed = (now - due).as_nanos() / step;
    let next = due.as_nanos() + (missed + 1) * step;
    Duration::new((next / NANOS_PER_SEC) as u64, (next % NANOS_PER_SEC) as u32)
}
