use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draw::AnalogKind;
use crate::sam::{Action, ControlState};

/// Every observable change in a running pomodoro produces an Event.
/// Hosts drain them after each submit or frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TransitionAccepted {
        from: ControlState,
        to: ControlState,
        action: Action,
        at_ms: f64,
        at: DateTime<Utc>,
    },
    TransitionRejected {
        state: ControlState,
        action: Action,
        at_ms: f64,
        at: DateTime<Utc>,
    },
    /// The armed countdown reached zero.
    Timeout {
        state: ControlState,
        at_ms: f64,
        at: DateTime<Utc>,
    },
    CountdownArmed {
        kind: AnalogKind,
        duration_ms: f64,
        at_ms: f64,
        at: DateTime<Utc>,
    },
    /// The on-screen h:mm:ss text changed.
    Readout {
        text: String,
        at_ms: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Frame-clock time the event was recorded at.
    pub fn at_ms(&self) -> f64 {
        match self {
            Event::TransitionAccepted { at_ms, .. }
            | Event::TransitionRejected { at_ms, .. }
            | Event::Timeout { at_ms, .. }
            | Event::CountdownArmed { at_ms, .. }
            | Event::Readout { at_ms, .. } => *at_ms,
        }
    }
}
