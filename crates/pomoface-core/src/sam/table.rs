//! Allow-list of legal control-state transitions.
//!
//! The table is the single source of truth for which actions each state
//! accepts. Every state must have an entry, even an empty one; see
//! [`TransitionTable::validate`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::action::{Action, ControlState};
use crate::error::TableError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionTable {
    entries: BTreeMap<ControlState, Vec<Action>>,
}

impl Default for TransitionTable {
    /// The standard session/break cycle, with cancel paths back to input.
    fn default() -> Self {
        use Action as A;
        use ControlState as S;

        Self::empty()
            .with_entry(S::InputSession, &[A::StartSession, A::InputBreak])
            .with_entry(S::StartedSession, &[A::RunSession, A::InputSession])
            .with_entry(S::RunningSession, &[A::EndSession, A::InputSession])
            .with_entry(S::EndedSession, &[A::StartBreak, A::InputSession])
            .with_entry(S::InputBreak, &[A::StartBreak, A::InputSession])
            .with_entry(S::StartedBreak, &[A::RunBreak, A::InputBreak])
            .with_entry(S::RunningBreak, &[A::EndBreak, A::InputBreak])
            .with_entry(S::EndedBreak, &[A::StartSession, A::InputSession])
    }
}

impl TransitionTable {
    /// A table with no entries; every state rejects everything.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entry(mut self, state: ControlState, allowed: &[Action]) -> Self {
        self.set(state, allowed);
        self
    }

    /// Replace the allow-list for `state`. Duplicate actions are collapsed.
    pub fn set(&mut self, state: ControlState, allowed: &[Action]) {
        let mut actions: Vec<Action> = Vec::with_capacity(allowed.len());
        for action in allowed {
            if !actions.contains(action) {
                actions.push(*action);
            }
        }
        self.entries.insert(state, actions);
    }

    pub fn has_entry(&self, state: ControlState) -> bool {
        self.entries.contains_key(&state)
    }

    /// Actions accepted from `state`. Missing entries accept nothing.
    pub fn allowed(&self, state: ControlState) -> &[Action] {
        self.entries.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn allows(&self, state: ControlState, action: Action) -> bool {
        self.allowed(state).contains(&action)
    }

    pub fn entries(&self) -> impl Iterator<Item = (ControlState, &[Action])> {
        self.entries.iter().map(|(state, actions)| (*state, actions.as_slice()))
    }

    /// Completeness check run before a model is built.
    ///
    /// `follow_ups` are the transitions proposed automatically, without
    /// external input. Each must be allowed, and together they must not form
    /// a cycle.
    pub fn validate(&self, follow_ups: &[(ControlState, Action)]) -> Result<(), TableError> {
        if let Some(state) = ControlState::ALL.into_iter().find(|s| !self.has_entry(*s)) {
            return Err(TableError::MissingEntry(state));
        }
        if let Some((from, action)) = follow_ups
            .iter()
            .find(|(from, action)| !self.allows(*from, *action))
        {
            return Err(TableError::FollowUpNotAllowed {
                from: *from,
                action: *action,
            });
        }

        let edges: Vec<(ControlState, ControlState)> = follow_ups
            .iter()
            .map(|(from, action)| (*from, action.target()))
            .collect();
        let mut done = BTreeSet::new();
        for state in ControlState::ALL {
            let mut path = Vec::new();
            if let Some(cycle) = find_cycle(state, &edges, &mut path, &mut done) {
                return Err(TableError::AutoCycle(cycle));
            }
        }
        Ok(())
    }
}

fn find_cycle(
    state: ControlState,
    edges: &[(ControlState, ControlState)],
    path: &mut Vec<ControlState>,
    done: &mut BTreeSet<ControlState>,
) -> Option<Vec<ControlState>> {
    if let Some(pos) = path.iter().position(|s| *s == state) {
        let mut cycle = path[pos..].to_vec();
        cycle.push(state);
        return Some(cycle);
    }
    if done.contains(&state) {
        return None;
    }
    path.push(state);
    for (_, to) in edges.iter().filter(|(from, _)| *from == state) {
        if let Some(cycle) = find_cycle(*to, edges, path, done) {
            return Some(cycle);
        }
    }
    path.pop();
    done.insert(state);
    None
}
