//! The control-state model.
//!
//! The model holds the current [`ControlState`] and the session/break
//! durations. Proposals arrive through [`Model::present`] and are accepted
//! only when the [`TransitionTable`] lists the action for the current state.
//! A rejected proposal is not an error; the state is simply left alone.

use serde::{Deserialize, Serialize};

use super::action::{Action, ControlState};
use super::table::TransitionTable;
use crate::clock::coerce_duration;

/// Outcome of one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Transition {
    Accepted {
        from: ControlState,
        to: ControlState,
        action: Action,
    },
    Rejected {
        state: ControlState,
        action: Action,
    },
}

impl Transition {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Transition::Accepted { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    state: ControlState,
    table: TransitionTable,
    session_ms: f64,
    break_ms: f64,
    timed_out: bool,
}

impl Model {
    /// A model in `InputSession` using `table` as its allow-list.
    pub fn new(table: TransitionTable) -> Self {
        Self {
            state: ControlState::InputSession,
            table,
            session_ms: 0.0,
            break_ms: 0.0,
            timed_out: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn session_duration(&self) -> f64 {
        self.session_ms
    }

    pub fn break_duration(&self) -> f64 {
        self.break_ms
    }

    /// Whether the running countdown has reported completion.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Actions the current state accepts.
    pub fn allowed_actions(&self) -> &[Action] {
        self.table.allowed(self.state)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Invalid or negative values become `0`.
    pub fn set_session_duration(&mut self, ms: f64) {
        self.session_ms = coerce_duration(ms);
    }

    pub fn set_break_duration(&mut self, ms: f64) {
        self.break_ms = coerce_duration(ms);
    }

    /// Record that the running countdown reached zero.
    pub fn signal_timeout(&mut self) {
        self.timed_out = true;
    }

    /// Accept `action` if the current state's allow-list contains it.
    pub fn present(&mut self, action: Action) -> Transition {
        let from = self.state;
        if !self.table.allows(from, action) {
            tracing::trace!(state = %from, %action, "proposal rejected");
            return Transition::Rejected {
                state: from,
                action,
            };
        }
        let to = action.target();
        self.state = to;
        self.timed_out = false;
        tracing::debug!(%from, %to, %action, "transition accepted");
        Transition::Accepted { from, to, action }
    }
}
