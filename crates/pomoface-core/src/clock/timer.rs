//! Absolute time bookkeeping.
//!
//! A [`Timer`] holds four marks on a single monotonic millisecond axis:
//! `start`, `last`, `current` and `end`. It never schedules anything; the
//! caller moves it forward with [`Timer::update`].

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Instant;

/// Time cursor with start/last/current/end marks, all in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    start: f64,
    last: f64,
    current: f64,
    end: f64,
}

impl Timer {
    /// Create a timer with every mark at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timer with every mark at `time`.
    pub fn starting_at(time: f64) -> Self {
        let mut timer = Self::new();
        timer.reset(time);
        timer
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn time(&self) -> f64 {
        self.current
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn last(&self) -> f64 {
        self.last
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Time between the two most recent updates.
    pub fn delta(&self) -> f64 {
        self.current - self.last
    }

    /// Time since the last reset.
    pub fn elapsed(&self) -> f64 {
        self.current - self.start
    }

    /// Time left until `end`, floored at zero.
    pub fn remaining(&self) -> f64 {
        (self.end - self.current).max(0.0)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance the cursor: `last` takes the old `current`, `current` takes `time`.
    pub fn update(&mut self, time: f64) -> f64 {
        self.last = self.current;
        self.current = sanitize(time);
        self.current
    }

    /// Advance the cursor to the process-monotonic clock.
    pub fn update_now(&mut self) -> f64 {
        self.update(now_ms())
    }

    /// Collapse all four marks onto `time`.
    pub fn reset(&mut self, time: f64) -> f64 {
        let time = sanitize(time);
        self.start = time;
        self.last = time;
        self.current = time;
        self.end = time;
        self.current
    }

    pub fn reset_now(&mut self) -> f64 {
        self.reset(now_ms())
    }

    /// Place `end` at `duration` past the current time and return it.
    ///
    /// Negative or non-finite durations count as zero.
    pub fn end_after(&mut self, duration: f64) -> f64 {
        self.end = self.current + sanitize(duration).max(0.0);
        self.end
    }
}

/// Milliseconds since the first call in this process.
pub fn now_ms() -> f64 {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Non-finite times collapse to zero so the marks stay ordered numbers.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_all_zero() {
        let timer = Timer::new();
        assert_eq!(timer.time(), 0.0);
        assert_eq!(timer.elapsed(), 0.0);
        assert_eq!(timer.delta(), 0.0);
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn reset_collapses_marks() {
        let mut timer = Timer::new();
        timer.update(40.0);
        timer.update(90.0);
        assert_eq!(timer.reset(250.0), 250.0);
        assert_eq!(timer.time(), 250.0);
        assert_eq!(timer.delta(), 0.0);
        assert_eq!(timer.elapsed(), 0.0);
        assert_eq!(timer.end(), 250.0);
    }

    #[test]
    fn consecutive_updates_give_delta() {
        let mut timer = Timer::starting_at(0.0);
        timer.update(120.0);
        timer.update(175.5);
        assert_eq!(timer.delta(), 55.5);
        assert_eq!(timer.elapsed(), 175.5);
        assert!(timer.last() <= timer.time());
    }

    #[test]
    fn remaining_is_floored_at_zero() {
        let mut timer = Timer::starting_at(1000.0);
        assert_eq!(timer.end_after(500.0), 1500.0);
        timer.update(1200.0);
        assert_eq!(timer.remaining(), 300.0);
        timer.update(1800.0);
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn negative_duration_ends_now() {
        let mut timer = Timer::starting_at(10.0);
        assert_eq!(timer.end_after(-5.0), 10.0);
    }

    #[test]
    fn non_finite_time_is_clamped() {
        let mut timer = Timer::starting_at(10.0);
        timer.update(f64::NAN);
        assert_eq!(timer.time(), 0.0);
    }

    #[test]
    fn now_is_monotonic() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }
}
