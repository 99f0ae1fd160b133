//! Display representation and automatic follow-ups.
//!
//! [`Mode`] turns the model into something a [`View`](super::View) can show
//! and decides which action, if any, the system proposes on its own:
//!
//! - synchronously, in the same call stack as the triggering proposal
//!   ([`Mode::next_action`]);
//! - deferred to the next frame, so the ended phase is observable
//!   ([`Mode::deferred_action`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::action::{Action, ControlState};
use super::model::Model;
use crate::clock::format_time;
use crate::draw::AnalogKind;

/// Content of one named display region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionValue {
    Text(String),
    List(Vec<String>),
}

/// Region name → content, pushed to the view on every render pass.
pub type Representation = BTreeMap<String, RegionValue>;

/// Which panel the view should put forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    ShowSession,
    ShowBreak,
    ProposeSession,
    ProposeBreak,
}

/// Side effect of entering a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Arm the matching face as a countdown of `duration` ms.
    Countdown { kind: AnalogKind, duration: f64 },
    /// Abort any countdown and show the elapsed-time face.
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    auto_cycle: bool,
}

impl Default for Mode {
    fn default() -> Self {
        Self { auto_cycle: true }
    }
}

impl Mode {
    /// Transitions proposed without external input within one cascade.
    ///
    /// The running → ended rules only fire once the model has timed out.
    pub const FOLLOW_UPS: [(ControlState, Action); 4] = [
        (ControlState::StartedSession, Action::RunSession),
        (ControlState::StartedBreak, Action::RunBreak),
        (ControlState::RunningSession, Action::EndSession),
        (ControlState::RunningBreak, Action::EndBreak),
    ];

    /// `auto_cycle` controls whether ended phases roll into the next one.
    pub fn new(auto_cycle: bool) -> Self {
        Self { auto_cycle }
    }

    pub fn auto_cycle(&self) -> bool {
        self.auto_cycle
    }

    pub fn represent(&self, model: &Model, readout: &str) -> Representation {
        let mut representation = Representation::new();
        representation.insert("state".into(), RegionValue::Text(model.state().name().into()));
        representation.insert(
            "session".into(),
            RegionValue::Text(format_time(model.session_duration())),
        );
        representation.insert(
            "break".into(),
            RegionValue::Text(format_time(model.break_duration())),
        );
        representation.insert("readout".into(), RegionValue::Text(readout.into()));
        representation.insert(
            "controls".into(),
            RegionValue::List(
                model
                    .allowed_actions()
                    .iter()
                    .map(|action| action.name().to_string())
                    .collect(),
            ),
        );
        representation
    }

    pub fn display(&self, model: &Model) -> DisplayMode {
        match model.state() {
            ControlState::InputSession => DisplayMode::ProposeSession,
            ControlState::InputBreak => DisplayMode::ProposeBreak,
            state if state.is_session() => DisplayMode::ShowSession,
            _ => DisplayMode::ShowBreak,
        }
    }

    /// What entering the model's current state should set in motion.
    pub fn effect(&self, model: &Model) -> Option<Effect> {
        match model.state() {
            ControlState::StartedSession => Some(Effect::Countdown {
                kind: AnalogKind::Session,
                duration: model.session_duration(),
            }),
            ControlState::StartedBreak => Some(Effect::Countdown {
                kind: AnalogKind::Break,
                duration: model.break_duration(),
            }),
            ControlState::InputSession | ControlState::InputBreak => Some(Effect::Idle),
            _ => None,
        }
    }

    /// Follow-up to present immediately, in the same cascade.
    pub fn next_action(&self, model: &Model) -> Option<Action> {
        let state = model.state();
        Self::FOLLOW_UPS
            .iter()
            .find(|(from, _)| *from == state)
            .filter(|(from, _)| !from.is_running() || model.timed_out())
            .map(|(_, action)| *action)
    }

    /// Follow-up to present at the start of the next frame.
    pub fn deferred_action(&self, model: &Model) -> Option<Action> {
        if !self.auto_cycle {
            return None;
        }
        match model.state() {
            ControlState::EndedSession => Some(Action::StartBreak),
            ControlState::EndedBreak => Some(Action::StartSession),
            _ => None,
        }
    }
}
