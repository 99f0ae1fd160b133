//! Control states and the named intents that propose moving between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One phase of the session/break lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlState {
    InputSession,
    StartedSession,
    RunningSession,
    EndedSession,
    InputBreak,
    StartedBreak,
    RunningBreak,
    EndedBreak,
}

impl ControlState {
    pub const ALL: [ControlState; 8] = [
        ControlState::InputSession,
        ControlState::StartedSession,
        ControlState::RunningSession,
        ControlState::EndedSession,
        ControlState::InputBreak,
        ControlState::StartedBreak,
        ControlState::RunningBreak,
        ControlState::EndedBreak,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ControlState::InputSession => "inputSession",
            ControlState::StartedSession => "startedSession",
            ControlState::RunningSession => "runningSession",
            ControlState::EndedSession => "endedSession",
            ControlState::InputBreak => "inputBreak",
            ControlState::StartedBreak => "startedBreak",
            ControlState::RunningBreak => "runningBreak",
            ControlState::EndedBreak => "endedBreak",
        }
    }

    pub fn is_session(self) -> bool {
        matches!(
            self,
            ControlState::InputSession
                | ControlState::StartedSession
                | ControlState::RunningSession
                | ControlState::EndedSession
        )
    }

    pub fn is_input(self) -> bool {
        matches!(self, ControlState::InputSession | ControlState::InputBreak)
    }

    pub fn is_started(self) -> bool {
        matches!(self, ControlState::StartedSession | ControlState::StartedBreak)
    }

    pub fn is_running(self) -> bool {
        matches!(self, ControlState::RunningSession | ControlState::RunningBreak)
    }

    pub fn is_ended(self) -> bool {
        matches!(self, ControlState::EndedSession | ControlState::EndedBreak)
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ControlState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControlState::ALL
            .into_iter()
            .find(|state| state.name() == s)
            .ok_or_else(|| format!("unknown control state: {s}"))
    }
}

/// A named proposal to move to a specific control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    InputSession,
    StartSession,
    RunSession,
    EndSession,
    InputBreak,
    StartBreak,
    RunBreak,
    EndBreak,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::InputSession,
        Action::StartSession,
        Action::RunSession,
        Action::EndSession,
        Action::InputBreak,
        Action::StartBreak,
        Action::RunBreak,
        Action::EndBreak,
    ];

    /// The control state this action proposes.
    pub fn target(self) -> ControlState {
        match self {
            Action::InputSession => ControlState::InputSession,
            Action::StartSession => ControlState::StartedSession,
            Action::RunSession => ControlState::RunningSession,
            Action::EndSession => ControlState::EndedSession,
            Action::InputBreak => ControlState::InputBreak,
            Action::StartBreak => ControlState::StartedBreak,
            Action::RunBreak => ControlState::RunningBreak,
            Action::EndBreak => ControlState::EndedBreak,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::InputSession => "inputSession",
            Action::StartSession => "startSession",
            Action::RunSession => "runSession",
            Action::EndSession => "endSession",
            Action::InputBreak => "inputBreak",
            Action::StartBreak => "startBreak",
            Action::RunBreak => "runBreak",
            Action::EndBreak => "endBreak",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}
