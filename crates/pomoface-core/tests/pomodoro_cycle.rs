//! End-to-end tests for the session/break cycle.
//!
//! A fake host owns the clock: it advances simulated time, takes the due
//! refresh from [`HostFrames`] and hands it to the pomodoro together with a
//! recording surface. Nothing here touches a real display or wall clock.

use pomoface_core::sam::DisplayMode;
use pomoface_core::{
    Action, AnalogKind, Config, ControlState, Event, HostFrames, Pomodoro, RecordingSurface,
    RecordingView,
};

// ============================================================================
// Test Helpers
// ============================================================================

struct Host {
    app: Pomodoro<RecordingView, HostFrames>,
    surface: RecordingSurface,
}

impl Host {
    fn new(session_ms: f64, break_ms: f64) -> Self {
        Self::with_config(Config::default(), session_ms, break_ms)
    }

    fn with_config(config: Config, session_ms: f64, break_ms: f64) -> Self {
        let app = Pomodoro::new(
            &config,
            RecordingView::new(session_ms, break_ms),
            HostFrames::new(0.0),
        )
        .expect("default table is valid");
        Self {
            app,
            surface: RecordingSurface::new(),
        }
    }

    /// Deliver one refresh at `time`.
    fn frame(&mut self, time: f64) -> bool {
        self.app.scheduler_mut().set_now(time);
        match self.app.scheduler_mut().take_due() {
            Some(handle) => self.app.frame(handle, time, &mut self.surface),
            None => false,
        }
    }

    /// Deliver refreshes every `step` ms from `from` up to and including `until`.
    fn run_until(&mut self, from: f64, until: f64, step: f64) {
        let mut t = from;
        while t <= until {
            self.frame(t);
            t += step;
        }
    }

    fn accepted(&mut self) -> Vec<(ControlState, ControlState)> {
        self.app
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                Event::TransitionAccepted { from, to, .. } => Some((from, to)),
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn session_of_1500ms_ends_with_zero_readout() {
    let mut host = Host::new(1500.0, 1000.0);
    host.app.submit(Action::StartSession);
    assert_eq!(host.app.state(), ControlState::RunningSession);

    host.run_until(16.0, 1499.0, 16.0);
    assert_eq!(host.app.state(), ControlState::RunningSession);

    host.frame(1500.0);
    assert_eq!(host.app.state(), ControlState::EndedSession);
    assert_eq!(host.app.readout(), "0:00:00");
    assert_eq!(host.app.view().text("readout"), Some("0:00:00"));
    assert_eq!(host.app.view().text("state"), Some("endedSession"));
}

#[test]
fn full_cycle_returns_to_session() {
    let mut host = Host::new(1000.0, 500.0);
    host.app.submit(Action::StartSession);
    host.run_until(100.0, 2000.0, 100.0);

    assert_eq!(
        host.accepted(),
        vec![
            (ControlState::InputSession, ControlState::StartedSession),
            (ControlState::StartedSession, ControlState::RunningSession),
            (ControlState::RunningSession, ControlState::EndedSession),
            (ControlState::EndedSession, ControlState::StartedBreak),
            (ControlState::StartedBreak, ControlState::RunningBreak),
            (ControlState::RunningBreak, ControlState::EndedBreak),
            (ControlState::EndedBreak, ControlState::StartedSession),
            (ControlState::StartedSession, ControlState::RunningSession),
        ]
    );
    assert_eq!(host.app.active_kind(), AnalogKind::Session);
}

#[test]
fn ended_state_is_visible_for_one_frame() {
    let mut host = Host::new(1000.0, 500.0);
    host.app.submit(Action::StartSession);
    host.frame(1000.0);
    assert_eq!(host.app.state(), ControlState::EndedSession);
    assert_eq!(host.app.view().display(), Some(DisplayMode::ShowSession));

    host.frame(1016.0);
    assert_eq!(host.app.state(), ControlState::RunningBreak);
    assert_eq!(host.app.view().display(), Some(DisplayMode::ShowBreak));
}

#[test]
fn cancel_from_break_goes_back_to_break_input() {
    let mut host = Host::new(1000.0, 60_000.0);
    host.app.submit(Action::StartSession);
    host.frame(1000.0);
    host.frame(1016.0);
    assert_eq!(host.app.state(), ControlState::RunningBreak);

    host.app.submit(Action::InputBreak);
    assert_eq!(host.app.state(), ControlState::InputBreak);
    assert_eq!(host.app.active_kind(), AnalogKind::Timer);
    assert_eq!(host.app.view().display(), Some(DisplayMode::ProposeBreak));

    host.run_until(2000.0, 120_000.0, 1000.0);
    assert_eq!(host.app.state(), ControlState::InputBreak);
}

#[test]
fn idle_face_counts_elapsed_time() {
    let mut host = Host::new(1000.0, 500.0);
    host.run_until(1000.0, 61_000.0, 1000.0);
    assert_eq!(host.app.readout(), "0:01:01");
    assert_eq!(host.app.state(), ControlState::InputSession);
}

#[test]
fn zero_length_session_ends_on_the_next_frame() {
    let mut host = Host::new(0.0, 500.0);
    host.app.submit(Action::StartSession);
    assert_eq!(host.app.state(), ControlState::RunningSession);
    host.frame(16.0);
    assert_eq!(host.app.state(), ControlState::EndedSession);
}

#[test]
fn frame_interval_throttles_the_cycle() {
    let mut config = Config::default();
    config.timer.frame_interval_ms = 250.0;
    let mut host = Host::with_config(config, 1000.0, 500.0);
    host.app.submit(Action::StartSession);

    assert!(!host.frame(100.0));
    assert!(host.frame(250.0));
    assert!(host.frame(900.0));
    // Skipped refreshes never sync the clock.
    assert!(!host.frame(1000.0));
    assert_eq!(host.app.state(), ControlState::RunningSession);
    assert!(host.frame(1150.0));
    assert_eq!(host.app.state(), ControlState::EndedSession);
}

#[test]
fn every_frame_clears_then_draws_the_active_face() {
    let mut host = Host::new(60_000.0, 500.0);
    host.app.submit(Action::StartSession);
    host.frame(16.0);
    host.frame(32.0);
    assert_eq!(host.surface.clears(), 2);
    assert_eq!(host.surface.frame().len(), 5);
}

#[test]
fn illegal_intents_are_dropped_and_logged() {
    let mut host = Host::new(1000.0, 500.0);
    host.app.drain_events();
    let transition = host.app.submit(Action::RunBreak);
    assert!(!transition.is_accepted());
    assert_eq!(host.app.state(), ControlState::InputSession);

    let events = host.app.drain_events();
    assert!(matches!(
        events.as_slice(),
        [Event::TransitionRejected {
            state: ControlState::InputSession,
            action: Action::RunBreak,
            ..
        }]
    ));
}
