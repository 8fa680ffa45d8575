//! Deadline-based timers polled from the host's event loop.
//!
//! Nothing here sleeps or spawns; the owner calls `poll`/`fire_if_due` with
//! the current time and acts on the result. Cancelling is just clearing the
//! deadline, so teardown cannot leak a timer.

use chrono::{Duration, NaiveDateTime};

/// Fires once, `delay` after the most recent `arm`.
#[derive(Debug, Clone, PartialEq)]
pub struct Debounce {
    delay: Duration,
    due_at: Option<NaiveDateTime>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            due_at: None,
        }
    }

    /// Start or restart the countdown.
    pub fn arm(&mut self, now: NaiveDateTime) {
        self.due_at = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    pub fn due_at(&self) -> Option<NaiveDateTime> {
        self.due_at
    }

    /// True exactly once when the deadline has passed.
    pub fn fire_if_due(&mut self, now: NaiveDateTime) -> bool {
        match self.due_at {
            Some(due) if now >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Periodic timer. Missed periods collapse into a single firing.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period: Duration,
    next_due: Option<NaiveDateTime>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn start(&mut self, now: NaiveDateTime) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next firing.
    pub fn next_due_in(&self, now: NaiveDateTime) -> Option<Duration> {
        self.next_due
            .map(|due| if due > now { due - now } else { Duration::zero() })
    }
}
