//! Countdown timer with a single-shot completion signal.
//!
//! ## Signal lifecycle
//!
//! ```text
//! countdown(d > 0) -> Pending -> Resolved   (sync reaches end)
//!                            \-> Rejected   (reset, or a new countdown)
//! ```
//!
//! At most one signal is outstanding per [`Countdown`].

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

use super::timer::{sanitize, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmState {
    Pending,
    Resolved,
    Rejected,
}

/// Shared handle to a countdown's completion signal.
///
/// Clones observe the same state. Only the owning [`Countdown`] settles it.
#[derive(Debug, Clone)]
pub struct Alarm {
    state: Rc<Cell<AlarmState>>,
}

impl Alarm {
    fn pending() -> Self {
        Self {
            state: Rc::new(Cell::new(AlarmState::Pending)),
        }
    }

    /// An alarm that has already gone off.
    pub fn resolved() -> Self {
        Self {
            state: Rc::new(Cell::new(AlarmState::Resolved)),
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state.get()
    }

    pub fn is_pending(&self) -> bool {
        self.state() == AlarmState::Pending
    }

    pub fn is_resolved(&self) -> bool {
        self.state() == AlarmState::Resolved
    }

    pub fn is_rejected(&self) -> bool {
        self.state() == AlarmState::Rejected
    }

    fn settle(&self, outcome: AlarmState) {
        if self.is_pending() {
            self.state.set(outcome);
        }
    }
}

/// A [`Timer`] with an end moment and one pending [`Alarm`].
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    timer: Timer,
    alarm: Option<Alarm>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn time(&self) -> f64 {
        self.timer.time()
    }

    pub fn elapsed(&self) -> f64 {
        self.timer.elapsed()
    }

    pub fn delta(&self) -> f64 {
        self.timer.delta()
    }

    /// Absolute end moment.
    pub fn ending(&self) -> f64 {
        self.timer.end()
    }

    /// Total length of the armed countdown.
    pub fn duration(&self) -> f64 {
        self.timer.end() - self.timer.start()
    }

    /// Time from `time` until the end moment, floored at zero.
    pub fn until(&self, time: f64) -> f64 {
        (self.timer.end() - sanitize(time)).max(0.0)
    }

    /// Time from the current cursor until the end moment.
    pub fn remaining(&self) -> f64 {
        self.until(self.timer.time())
    }

    pub fn has_pending_alarm(&self) -> bool {
        self.alarm.is_some()
    }

    /// The pending alarm, or an already-resolved one when nothing is armed.
    pub fn wait_alarm(&self) -> Alarm {
        self.alarm.clone().unwrap_or_else(Alarm::resolved)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance to `time`; resolves the pending alarm once nothing remains.
    pub fn sync(&mut self, time: f64) -> f64 {
        let now = self.timer.update(time);
        if self.remaining() == 0.0 {
            if let Some(alarm) = self.alarm.take() {
                alarm.settle(AlarmState::Resolved);
            }
        }
        now
    }

    /// Collapse the timer onto `time`, aborting any pending alarm.
    pub fn reset(&mut self, time: f64) -> f64 {
        let now = self.timer.reset(time);
        if let Some(alarm) = self.alarm.take() {
            alarm.settle(AlarmState::Rejected);
        }
        now
    }

    /// Start a countdown of `duration` at `time`.
    ///
    /// A pending alarm from an earlier countdown is rejected first. A zero
    /// duration arms nothing: the countdown is already over.
    pub fn countdown(&mut self, time: f64, duration: f64) -> Alarm {
        self.reset(time);
        let duration = sanitize(duration);
        if duration > 0.0 {
            self.timer.end_after(duration);
            let alarm = Alarm::pending();
            self.alarm = Some(alarm.clone());
            alarm
        } else {
            Alarm::resolved()
        }
    }
}
