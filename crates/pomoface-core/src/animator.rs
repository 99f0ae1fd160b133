//! Frame loop driver.
//!
//! The animator does not own a thread or a timer. It asks a
//! [`FrameScheduler`] for display refreshes, and the host calls
//! [`Animator::frame`] when one fires.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running -> Stopped
//! ```
//!
//! On each refresh at time `T` the animator runs the update phase and then
//! the render phase, but only once at least `frame_interval` ms have passed
//! since the last executed frame (an interval of `0` runs every refresh).
//! While running it always requests the next refresh.

use crate::clock::{coerce_duration, Alarm, Countdown};
use crate::dispatch::{Callback, Dispatcher, PeriodicDispatcher};
use crate::draw::{DrawList, Surface};

/// Opaque id of a requested display refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host display-refresh primitive.
pub trait FrameScheduler {
    /// Monotonic host time in milliseconds.
    fn now(&self) -> f64;

    /// Ask for one refresh callback.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a refresh request that has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler for hosts that own their clock.
///
/// The host moves time with [`HostFrames::set_now`] and collects the due
/// refresh with [`HostFrames::take_due`].
#[derive(Debug, Clone, Default)]
pub struct HostFrames {
    now: f64,
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl HostFrames {
    pub fn new(now: f64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    pub fn set_now(&mut self, now: f64) {
        self.now = now;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The outstanding refresh request, if any.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for HostFrames {
    fn now(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Argument handed to update callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Refresh timestamp (ms).
    pub time: f64,
    /// Time since the previous executed frame (ms).
    pub delta: f64,
}

const DEFAULT_AVG_INTERVAL: f64 = 1000.0 / 60.0;

/// The per-refresh update/render driver.
pub struct Animator<S> {
    scheduler: S,
    running: bool,
    pending: Option<FrameHandle>,
    frame_interval: f64,
    last_time: f64,
    frame_avg_interval: f64,
    frames: u64,
    clock: Countdown,
    updates: PeriodicDispatcher<Frame>,
    renders: Dispatcher<DrawList>,
    draw_list: DrawList,
}

impl<S: FrameScheduler> Animator<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            running: false,
            pending: None,
            frame_interval: 0.0,
            last_time: 0.0,
            frame_avg_interval: DEFAULT_AVG_INTERVAL,
            frames: 0,
            clock: Countdown::new(),
            updates: PeriodicDispatcher::new(),
            renders: Dispatcher::new(),
            draw_list: DrawList::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_interval(&self) -> f64 {
        self.frame_interval
    }

    pub fn last_frame_time(&self) -> f64 {
        self.last_time
    }

    /// Frames that passed the interval gate since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn average_frame_interval(&self) -> f64 {
        self.frame_avg_interval
    }

    pub fn average_frame_rate(&self) -> f64 {
        1000.0 / self.frame_avg_interval
    }

    pub fn num_updates(&self, interval: Option<u64>) -> usize {
        self.updates.num_callbacks(interval)
    }

    pub fn num_renders(&self) -> usize {
        self.renders.num_callbacks()
    }

    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// The countdown clock synced at the start of every update phase.
    pub fn clock(&self) -> &Countdown {
        &self.clock
    }

    pub fn alarm(&self) -> Alarm {
        self.clock.wait_alarm()
    }

    /// Whether `handle` is the refresh this animator is waiting for.
    pub fn accepts(&self, handle: FrameHandle) -> bool {
        self.pending == Some(handle)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Run `callback` in the update phase, at most once per `interval` ms.
    pub fn add_update(&mut self, callback: Callback<Frame>, interval: u64) -> bool {
        self.updates.add_callback(callback, interval)
    }

    pub fn remove_update(&mut self, callback: &Callback<Frame>, interval: u64) -> bool {
        self.updates.remove_callback(callback, interval)
    }

    pub fn add_render(&mut self, callback: Callback<DrawList>) -> bool {
        self.renders.add_callback(callback)
    }

    pub fn remove_render(&mut self, callback: &Callback<DrawList>) -> bool {
        self.renders.remove_callback(callback)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the loop with a minimum of `frame_interval` ms between frames.
    ///
    /// No-op while already running.
    pub fn run(&mut self, frame_interval: f64) {
        if self.running {
            return;
        }
        self.frame_interval = coerce_duration(frame_interval);
        self.running = true;
        self.last_time = self.scheduler.now();
        self.updates.reset(self.last_time);
        self.pending = Some(self.scheduler.request_frame());
        tracing::debug!(frame_interval = self.frame_interval, "frame loop started");
    }

    /// Cancel the pending refresh and stop. No-op while stopped.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.running = false;
        tracing::debug!(frames = self.frames, "frame loop stopped");
    }

    /// Arm the shared countdown clock for `duration` ms from now.
    pub fn countdown(&mut self, duration: f64) -> Alarm {
        let now = self.scheduler.now();
        tracing::debug!(duration, at = now, "countdown armed");
        self.clock.countdown(now, duration)
    }

    /// Disarm the shared clock, rejecting a pending alarm.
    pub fn cancel_countdown(&mut self) {
        let now = self.scheduler.now();
        if self.clock.has_pending_alarm() {
            tracing::debug!(at = now, "countdown cancelled");
        }
        self.clock.reset(now);
    }

    /// Handle a display refresh at `time`.
    ///
    /// Returns whether the update and render phases ran. Refreshes for a
    /// handle that is not the pending one are ignored.
    pub fn frame(&mut self, handle: FrameHandle, time: f64, surface: &mut dyn Surface) -> bool {
        if !self.accepts(handle) {
            tracing::trace!(?handle, "ignoring stale refresh");
            return false;
        }
        self.pending = None;

        let delta = time - self.last_time;
        let due = self.frame_interval == 0.0 || delta >= self.frame_interval;
        if due {
            self.update_phase(time, delta);
            self.render_phase(surface);
            self.last_time = time;
            self.frame_avg_interval = 0.9 * self.frame_avg_interval + 0.1 * delta;
            self.frames += 1;
            tracing::trace!(time, delta, "frame");
        }

        if self.running {
            self.pending = Some(self.scheduler.request_frame());
        }
        due
    }

    fn update_phase(&mut self, time: f64, delta: f64) {
        self.clock.sync(time);
        let mut frame = Frame { time, delta };
        self.updates.sync(time, &mut frame);
    }

    fn render_phase(&mut self, surface: &mut dyn Surface) {
        self.renders.dispatch(&mut self.draw_list);
        self.draw_list.flush(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{ArcStroke, RecordingSurface};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn drive(animator: &mut Animator<HostFrames>, surface: &mut RecordingSurface, time: f64) -> bool {
        animator.scheduler_mut().set_now(time);
        match animator.scheduler_mut().take_due() {
            Some(handle) => animator.frame(handle, time, surface),
            None => false,
        }
    }

    #[test]
    fn run_and_stop_are_idempotent() {
        let mut animator = Animator::new(HostFrames::new(0.0));
        animator.run(0.0);
        animator.run(50.0);
        assert!(animator.is_running());
        assert_eq!(animator.frame_interval(), 0.0);

        animator.stop();
        animator.stop();
        assert!(!animator.is_running());
        assert!(!animator.scheduler().is_pending());
    }

    #[test]
    fn frame_interval_gates_update_and_render() {
        let updates = Rc::new(Cell::new(0));
        let mut animator = Animator::new(HostFrames::new(0.0));
        let counter = Rc::clone(&updates);
        animator.add_update(Callback::function(move |_| counter.set(counter.get() + 1)), 0);
        animator.run(100.0);

        let mut surface = RecordingSurface::new();
        assert!(!drive(&mut animator, &mut surface, 40.0));
        assert!(!drive(&mut animator, &mut surface, 80.0));
        assert!(drive(&mut animator, &mut surface, 100.0));
        assert_eq!(updates.get(), 1);
        assert_eq!(surface.clears(), 1);
        assert_eq!(animator.last_frame_time(), 100.0);

        assert!(!drive(&mut animator, &mut surface, 150.0));
        assert!(drive(&mut animator, &mut surface, 220.0));
        assert_eq!(updates.get(), 2);
    }

    #[test]
    fn keeps_requesting_while_running() {
        let mut animator = Animator::new(HostFrames::new(0.0));
        animator.run(0.0);
        let mut surface = RecordingSurface::new();
        for t in [16.0, 32.0, 48.0] {
            assert!(drive(&mut animator, &mut surface, t));
            assert!(animator.scheduler().is_pending());
        }
        animator.stop();
        assert!(!drive(&mut animator, &mut surface, 64.0));
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut animator = Animator::new(HostFrames::new(0.0));
        animator.run(0.0);
        let stale = animator.scheduler_mut().take_due().unwrap();
        animator.stop();
        animator.run(0.0);
        assert!(!animator.accepts(stale));
        let mut surface = RecordingSurface::new();
        assert!(!animator.frame(stale, 10.0, &mut surface));
        assert_eq!(animator.frames(), 0);
    }

    #[test]
    fn render_phase_clears_then_draws_in_registration_order() {
        let mut animator = Animator::new(HostFrames::new(0.0));
        for radius in [1.0, 2.0, 3.0] {
            animator.add_render(Callback::function(move |list: &mut DrawList| {
                list.push(ArcStroke {
                    center_x: 0.0,
                    center_y: 0.0,
                    radius,
                    start_angle: 0.0,
                    end_angle: 1.0,
                    line_width: 1.0,
                    stroke_style: String::new(),
                })
            }));
        }
        assert_eq!(animator.num_renders(), 3);
        animator.run(0.0);
        let mut surface = RecordingSurface::new();
        drive(&mut animator, &mut surface, 16.0);
        drive(&mut animator, &mut surface, 32.0);
        let radii: Vec<f64> = surface.frame().iter().map(|s| s.radius).collect();
        assert_eq!(radii, vec![1.0, 2.0, 3.0]);
        assert_eq!(surface.clears(), 2);
    }

    #[test]
    fn moving_average_tracks_frame_interval() {
        let mut animator = Animator::new(HostFrames::new(0.0));
        animator.run(0.0);
        let mut surface = RecordingSurface::new();
        let mut t = 0.0;
        for _ in 0..200 {
            t += 20.0;
            drive(&mut animator, &mut surface, t);
        }
        assert!((animator.average_frame_interval() - 20.0).abs() < 0.01);
        assert!((animator.average_frame_rate() - 50.0).abs() < 0.1);
    }

    #[test]
    fn countdown_alarm_resolves_during_update_phase() {
        let mut animator = Animator::new(HostFrames::new(0.0));
        animator.run(0.0);
        let alarm = animator.countdown(100.0);
        assert!(alarm.is_pending());
        let mut surface = RecordingSurface::new();
        drive(&mut animator, &mut surface, 50.0);
        assert!(alarm.is_pending());
        drive(&mut animator, &mut surface, 100.0);
        assert!(alarm.is_resolved());
    }

    #[test]
    fn cancel_countdown_rejects_pending_alarm() {
        let mut animator = Animator::new(HostFrames::new(0.0));
        animator.run(0.0);
        let alarm = animator.countdown(100.0);
        animator.scheduler_mut().set_now(40.0);
        animator.cancel_countdown();
        assert!(alarm.is_rejected());
        assert!(!animator.clock().has_pending_alarm());

        let mut surface = RecordingSurface::new();
        drive(&mut animator, &mut surface, 200.0);
        assert!(alarm.is_rejected());
    }

    #[test]
    fn periodic_updates_fire_on_their_own_interval() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut animator = Animator::new(HostFrames::new(0.0));
        let log = Rc::clone(&seen);
        animator.add_update(
            Callback::function(move |frame: &mut Frame| log.borrow_mut().push(frame.time)),
            1000,
        );
        assert_eq!(animator.num_updates(Some(1000)), 1);
        animator.run(0.0);
        let mut surface = RecordingSurface::new();
        let mut t = 0.0;
        while t < 2500.0 {
            t += 100.0;
            drive(&mut animator, &mut surface, t);
        }
        assert_eq!(*seen.borrow(), vec![1100.0, 2200.0]);
    }
}
