//! Composition root: one model, one mode, one view and three clock faces
//! sharing a single animator.
//!
//! External intents enter through [`Pomodoro::submit`]; display refreshes
//! enter through [`Pomodoro::frame`]. Both run the proposal cascade to
//! completion before returning, so the host never observes a
//! half-applied transition.

use chrono::Utc;
use std::collections::VecDeque;

use crate::animator::{Animator, FrameHandle, FrameScheduler};
use crate::clock::Alarm;
use crate::config::Config;
use crate::draw::{Analog, AnalogConfig, AnalogKind, Surface};
use crate::error::Result;
use crate::events::Event;
use crate::sam::{
    Action, ControlState, DisplayMode, Effect, Mode, Model, RegionValue, Representation,
    Transition, View,
};

pub struct Pomodoro<V, S> {
    model: Model,
    mode: Mode,
    view: V,
    animator: Animator<S>,
    session: Analog,
    rest: Analog,
    idle: Analog,
    active: AnalogKind,
    alarm: Option<Alarm>,
    deferred: VecDeque<Action>,
    events: Vec<Event>,
}

impl<V: View, S: FrameScheduler> Pomodoro<V, S> {
    /// Wire everything together and start the frame loop.
    ///
    /// Fails when the configured allow-list is incomplete or lets the
    /// automatic follow-ups cycle.
    pub fn new(config: &Config, view: V, scheduler: S) -> Result<Self> {
        let table = config.transition_table();
        table.validate(&Mode::FOLLOW_UPS)?;

        let mut model = Model::new(table);
        model.set_session_duration(config.timer.session_ms());
        model.set_break_duration(config.timer.break_ms());

        let face = |kind| Analog::new(AnalogConfig::from_display(kind, &config.display));
        let mut app = Self {
            model,
            mode: Mode::new(config.timer.auto_cycle),
            view,
            animator: Animator::new(scheduler),
            session: face(AnalogKind::Session),
            rest: face(AnalogKind::Break),
            idle: face(AnalogKind::Timer),
            active: AnalogKind::Timer,
            alarm: None,
            deferred: VecDeque::new(),
            events: Vec::new(),
        };

        app.animator.run(config.timer.frame_interval_ms);
        app.idle.restart(&mut app.animator);
        app.render(false);
        Ok(app)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn state(&self) -> ControlState {
        self.model.state()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn animator(&self) -> &Animator<S> {
        &self.animator
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.animator.scheduler_mut()
    }

    /// Which face is currently animated.
    pub fn active_kind(&self) -> AnalogKind {
        self.active
    }

    /// Text of the active face's digital readout.
    pub fn readout(&self) -> String {
        self.face(self.active).readout()
    }

    /// Actions waiting for the next frame.
    pub fn deferred(&self) -> impl Iterator<Item = &Action> {
        self.deferred.iter()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Propose `action` on behalf of the user.
    ///
    /// Duration inputs are read from the view first. Pending automatic
    /// follow-ups are dropped: the user's intent wins.
    pub fn submit(&mut self, action: Action) -> Transition {
        self.deferred.clear();
        self.model
            .set_session_duration(self.view.read_session_duration_input());
        self.model
            .set_break_duration(self.view.read_break_duration_input());
        self.present(action)
    }

    /// Handle a display refresh at `time`.
    ///
    /// Stale or cancelled refreshes are ignored outright. Otherwise deferred
    /// follow-ups run first, then the animator's update and render phases.
    /// A countdown that reached zero is reported to the model once the frame
    /// is drawn.
    pub fn frame(&mut self, handle: FrameHandle, time: f64, surface: &mut dyn Surface) -> bool {
        if !self.animator.accepts(handle) {
            tracing::trace!(?handle, "ignoring stale refresh");
            return false;
        }

        let pending: Vec<Action> = self.deferred.drain(..).collect();
        for action in pending {
            self.present(action);
        }

        let ran = self.animator.frame(handle, time, surface);
        if !ran {
            return false;
        }

        if let Some(text) = self.face(self.active).take_readout_change() {
            let mut representation = Representation::new();
            representation.insert("readout".into(), RegionValue::Text(text.clone()));
            self.view.render(&representation);
            self.record(|at_ms, at| Event::Readout { text, at_ms, at });
        }

        self.check_alarm();
        true
    }

    /// Stop the frame loop and detach every face.
    pub fn stop(&mut self) {
        self.detach_faces();
        self.animator.stop();
    }

    // ── Internals ────────────────────────────────────────────────────

    fn check_alarm(&mut self) {
        let Some(alarm) = &self.alarm else {
            return;
        };
        if alarm.is_rejected() {
            self.alarm = None;
            return;
        }
        if !alarm.is_resolved() || !self.model.state().is_running() {
            return;
        }

        self.alarm = None;
        self.model.signal_timeout();
        let state = self.model.state();
        tracing::debug!(%state, "countdown finished");
        self.record(|at_ms, at| Event::Timeout { state, at_ms, at });
        if let Some(action) = self.mode.next_action(&self.model) {
            self.present(action);
        }
    }

    /// Present `action` and every synchronous follow-up it implies.
    fn present(&mut self, action: Action) -> Transition {
        let first = self.present_once(action);
        let mut steps = 1;
        while let Some(next) = self.mode.next_action(&self.model) {
            if steps >= ControlState::ALL.len() {
                tracing::error!(state = %self.model.state(), action = %next, "follow-up cascade did not settle");
                break;
            }
            self.present_once(next);
            steps += 1;
        }

        if let Some(action) = self.mode.deferred_action(&self.model) {
            if !self.deferred.contains(&action) {
                self.deferred.push_back(action);
            }
        }
        first
    }

    fn present_once(&mut self, action: Action) -> Transition {
        let transition = self.model.present(action);
        match transition {
            Transition::Accepted { from, to, action } => {
                self.record(|at_ms, at| Event::TransitionAccepted {
                    from,
                    to,
                    action,
                    at_ms,
                    at,
                });
            }
            Transition::Rejected { state, action } => {
                self.record(|at_ms, at| Event::TransitionRejected {
                    state,
                    action,
                    at_ms,
                    at,
                });
            }
        }
        self.render(transition.is_accepted());
        transition
    }

    /// Push the representation to the view, applying the entered state's
    /// effect first when `entered` is set.
    fn render(&mut self, entered: bool) {
        if entered {
            if let Some(effect) = self.mode.effect(&self.model) {
                self.apply(effect);
            }
        }

        let representation = self.mode.represent(&self.model, &self.readout());
        self.view.render(&representation);
        match self.mode.display(&self.model) {
            DisplayMode::ShowSession => self.view.show_session_display(),
            DisplayMode::ShowBreak => self.view.show_break_display(),
            DisplayMode::ProposeSession => self.view.propose_session_display(),
            DisplayMode::ProposeBreak => self.view.propose_break_display(),
        }
    }

    fn apply(&mut self, effect: Effect) {
        self.detach_faces();
        match effect {
            Effect::Countdown { kind, duration } => {
                let face = match kind {
                    AnalogKind::Session => &mut self.session,
                    AnalogKind::Break => &mut self.rest,
                    AnalogKind::Timer => &mut self.idle,
                };
                self.alarm = Some(face.countdown(duration, &mut self.animator));
                self.active = kind;
                self.record(|at_ms, at| Event::CountdownArmed {
                    kind,
                    duration_ms: duration,
                    at_ms,
                    at,
                });
            }
            Effect::Idle => {
                self.animator.cancel_countdown();
                self.alarm = None;
                self.idle.restart(&mut self.animator);
                self.active = AnalogKind::Timer;
            }
        }
    }

    fn detach_faces(&mut self) {
        for face in [&mut self.session, &mut self.rest, &mut self.idle] {
            face.deanimate(&mut self.animator);
        }
    }

    fn face(&self, kind: AnalogKind) -> &Analog {
        match kind {
            AnalogKind::Session => &self.session,
            AnalogKind::Break => &self.rest,
            AnalogKind::Timer => &self.idle,
        }
    }

    fn record(&mut self, event: impl FnOnce(f64, chrono::DateTime<Utc>) -> Event) {
        let at_ms = self.animator.now();
        self.events.push(event(at_ms, Utc::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::HostFrames;
    use crate::draw::RecordingSurface;
    use crate::sam::{RecordingView, TransitionTable};

    fn config(session_ms: f64, break_ms: f64) -> Config {
        let mut config = Config::default();
        config.timer.session_minutes = session_ms / 60_000.0;
        config.timer.break_minutes = break_ms / 60_000.0;
        config
    }

    fn app(session_ms: f64, break_ms: f64) -> Pomodoro<RecordingView, HostFrames> {
        Pomodoro::new(
            &config(session_ms, break_ms),
            RecordingView::new(session_ms, break_ms),
            HostFrames::new(0.0),
        )
        .unwrap()
    }

    fn drive(app: &mut Pomodoro<RecordingView, HostFrames>, surface: &mut RecordingSurface, time: f64) {
        app.scheduler_mut().set_now(time);
        let handle = app.scheduler_mut().take_due().unwrap();
        app.frame(handle, time, surface);
    }

    #[test]
    fn starts_idle_proposing_a_session() {
        let app = app(1500.0, 500.0);
        assert_eq!(app.state(), ControlState::InputSession);
        assert_eq!(app.active_kind(), AnalogKind::Timer);
        assert!(app.animator().is_running());
        assert_eq!(app.view().display(), Some(DisplayMode::ProposeSession));
        assert_eq!(app.view().text("state"), Some("inputSession"));
    }

    #[test]
    fn start_session_cascades_into_running() {
        let mut app = app(1500.0, 500.0);
        let transition = app.submit(Action::StartSession);
        assert!(transition.is_accepted());
        assert_eq!(app.state(), ControlState::RunningSession);
        assert_eq!(app.active_kind(), AnalogKind::Session);
        assert_eq!(app.view().display(), Some(DisplayMode::ShowSession));
        assert_eq!(app.readout(), "0:00:02");

        let accepted = app
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, Event::TransitionAccepted { .. }))
            .count();
        assert_eq!(accepted, 2);
    }

    #[test]
    fn rejected_submit_still_renders() {
        let mut app = app(1500.0, 500.0);
        let before = app.view().renders();
        let transition = app.submit(Action::EndBreak);
        assert!(!transition.is_accepted());
        assert_eq!(app.state(), ControlState::InputSession);
        assert_eq!(app.view().renders(), before + 1);
    }

    #[test]
    fn submit_reads_duration_inputs() {
        let mut app = app(1500.0, 500.0);
        app.view_mut().session_input = 3_600_000.0;
        app.view_mut().break_input = -5.0;
        app.submit(Action::StartSession);
        assert_eq!(app.model().session_duration(), 3_600_000.0);
        assert_eq!(app.model().break_duration(), 0.0);
        assert_eq!(app.view().text("session"), Some("1:00:00"));
        assert_eq!(app.readout(), "1:00:00");
    }

    #[test]
    fn session_ends_at_zero_then_rolls_into_break() {
        let mut app = app(1500.0, 500.0);
        let mut surface = RecordingSurface::new();
        app.submit(Action::StartSession);

        drive(&mut app, &mut surface, 1000.0);
        assert_eq!(app.state(), ControlState::RunningSession);

        drive(&mut app, &mut surface, 1500.0);
        assert_eq!(app.state(), ControlState::EndedSession);
        assert_eq!(app.view().text("readout"), Some("0:00:00"));
        assert_eq!(app.deferred().copied().collect::<Vec<_>>(), vec![Action::StartBreak]);

        drive(&mut app, &mut surface, 1516.0);
        assert_eq!(app.state(), ControlState::RunningBreak);
        assert_eq!(app.active_kind(), AnalogKind::Break);
        assert_eq!(app.view().display(), Some(DisplayMode::ShowBreak));
    }

    #[test]
    fn manual_cycle_waits_for_the_user() {
        let mut config = config(1000.0, 500.0);
        config.timer.auto_cycle = false;
        let mut app = Pomodoro::new(&config, RecordingView::new(1000.0, 500.0), HostFrames::new(0.0)).unwrap();
        let mut surface = RecordingSurface::new();
        app.submit(Action::StartSession);
        drive(&mut app, &mut surface, 1000.0);
        drive(&mut app, &mut surface, 1100.0);
        assert_eq!(app.state(), ControlState::EndedSession);
        assert_eq!(app.deferred().count(), 0);
    }

    #[test]
    fn cancelling_rejects_the_alarm_and_goes_idle() {
        let mut app = app(60_000.0, 500.0);
        let mut surface = RecordingSurface::new();
        app.submit(Action::StartSession);
        let alarm = app.animator().alarm();
        drive(&mut app, &mut surface, 2000.0);

        app.submit(Action::InputSession);
        assert!(alarm.is_rejected());
        assert_eq!(app.state(), ControlState::InputSession);
        assert_eq!(app.active_kind(), AnalogKind::Timer);

        drive(&mut app, &mut surface, 90_000.0);
        assert_eq!(app.state(), ControlState::InputSession);
    }

    #[test]
    fn user_intent_drops_pending_follow_up() {
        let mut app = app(1000.0, 500.0);
        let mut surface = RecordingSurface::new();
        app.submit(Action::StartSession);
        drive(&mut app, &mut surface, 1000.0);
        assert_eq!(app.state(), ControlState::EndedSession);

        app.submit(Action::InputSession);
        drive(&mut app, &mut surface, 1016.0);
        assert_eq!(app.state(), ControlState::InputSession);
    }

    #[test]
    fn stale_refresh_leaves_follow_ups_queued() {
        let mut app = app(1000.0, 500.0);
        let mut surface = RecordingSurface::new();
        app.submit(Action::StartSession);
        drive(&mut app, &mut surface, 1000.0);
        assert_eq!(app.state(), ControlState::EndedSession);

        assert!(!app.frame(FrameHandle(9999), 1010.0, &mut surface));
        assert_eq!(app.state(), ControlState::EndedSession);
        assert_eq!(app.deferred().copied().collect::<Vec<_>>(), vec![Action::StartBreak]);

        drive(&mut app, &mut surface, 1016.0);
        assert_eq!(app.state(), ControlState::RunningBreak);
    }

    #[test]
    fn incomplete_table_is_refused() {
        let mut config = config(1000.0, 500.0);
        config.transitions = Some(TransitionTable::default().with_entry(ControlState::StartedSession, &[]));
        let result = Pomodoro::new(&config, RecordingView::new(0.0, 0.0), HostFrames::new(0.0));
        assert!(result.is_err());
    }

    #[test]
    fn readout_changes_are_pushed_and_recorded() {
        let mut app = app(5000.0, 500.0);
        let mut surface = RecordingSurface::new();
        app.submit(Action::StartSession);
        app.drain_events();

        drive(&mut app, &mut surface, 1000.0);
        let readouts: Vec<String> = app
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Readout { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(readouts, vec!["0:00:04".to_string()]);
        assert_eq!(app.view().text("readout"), Some("0:00:04"));
    }

    #[test]
    fn stop_detaches_every_face() {
        let mut app = app(1000.0, 500.0);
        app.submit(Action::StartSession);
        app.stop();
        assert!(!app.animator().is_running());
        assert_eq!(app.animator().num_renders(), 0);
        assert_eq!(app.animator().num_updates(None), 0);
    }
}
