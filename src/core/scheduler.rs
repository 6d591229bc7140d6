//! Virtual-time timer wheel for the encounter engine.
//!
//! The scheduler never reads a wall clock. Its notion of "now" only moves
//! when the owner calls [`Scheduler::fire_next`] or [`Scheduler::advance_to`],
//! so a test can act as a fake clock and a pause is simply "stop advancing".
//! Timers carry a plain event value instead of a callback; the owner decides
//! what the event means at the moment it fires.

use std::time::Duration;

/// Cancelable handle returned by the `schedule_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer<E> {
    pub handle: TimerHandle,
    pub event: E,
    /// Virtual time at which the timer fired.
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct Timer<E> {
    id: u64,
    due: Duration,
    period: Option<Duration>,
    event: E,
}

/// Single-threaded timer queue over virtual time.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    timers: Vec<Timer<E>>,
    now: Duration,
    next_id: u64,
    paused: bool,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            timers: Vec::new(),
            now: Duration::ZERO,
            next_id: 1,
            paused: false,
        }
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time. Does not move while paused.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freezes or thaws every pending timer.
    ///
    /// Remaining delays are kept as they were, so a resume continues exactly
    /// where the pause left off.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Number of timers still pending (one-shot and repeating).
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.id == handle.0)
    }

    /// Time left before `handle` fires, if it is still pending.
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers
            .iter()
            .find(|t| t.id == handle.0)
            .map(|t| t.due.saturating_sub(self.now))
    }

    pub fn schedule_once(&mut self, delay: Duration, event: E) -> TimerHandle {
        self.insert(delay, None, event)
    }

    /// Schedules `event` every `interval`, first firing one interval from now.
    ///
    /// A zero interval is bumped to one millisecond so a repeating timer can
    /// never stall the queue.
    pub fn schedule_repeating(&mut self, interval: Duration, event: E) -> TimerHandle {
        let interval = interval.max(Duration::from_millis(1));
        self.insert(interval, Some(interval), event)
    }

    /// Cancels a timer. Returns false if it already fired or was canceled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != handle.0);
        self.timers.len() != before
    }

    /// Drops every pending timer.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Repeating timers are re-armed one period later.
    ///
    /// Returns `None` while paused or when nothing is due. Ties fire in
    /// scheduling order.
    pub fn fire_next(&mut self, until: Duration) -> Option<FiredTimer<E>> {
        if self.paused {
            return None;
        }

        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[index];
        let fired = FiredTimer {
            handle: TimerHandle(timer.id),
            event: timer.event.clone(),
            at: timer.due,
        };
        self.now = self.now.max(timer.due);

        // A repeating timer whose next deadline is past the end of time is
        // dropped.
        match timer.period.and_then(|period| timer.due.checked_add(period)) {
            Some(next) => timer.due = next,
            None => {
                self.timers.remove(index);
            }
        }

        Some(fired)
    }

    /// Moves the clock forward to `until` without firing anything.
    ///
    /// Callers drain [`Scheduler::fire_next`] first. Ignored while paused.
    pub fn advance_to(&mut self, until: Duration) {
        if !self.paused {
            self.now = self.now.max(until);
        }
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now.saturating_add(delay),
            period,
            event,
        });
        TimerHandle(id)
    }
}
