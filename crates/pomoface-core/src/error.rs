//! Core error types for pomoface-core.
//!
//! Runtime operations on the clock face and state machine never fail:
//! bad input is clamped and illegal transitions are dropped. Errors only
//! come out of construction (transition table checks) and config I/O.

use std::path::PathBuf;
use thiserror::Error;

use crate::sam::{Action, ControlState};

/// Core error type for pomoface-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Transition table defects
    #[error("Transition table error: {0}")]
    Table(#[from] TableError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home directory could not be determined
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Completeness defects in the transition allow-list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A state has no allow-list entry at all
    #[error("no allow-list entry for state '{0}'")]
    MissingEntry(ControlState),

    /// An automatic follow-up is not permitted by the table
    #[error("automatic follow-up '{action}' is not allowed from '{from}'")]
    FollowUpNotAllowed { from: ControlState, action: Action },

    /// Automatic follow-ups loop without external input
    #[error("automatic follow-ups form a cycle: {}", format_path(.0))]
    AutoCycle(Vec<ControlState>),
}

fn format_path(path: &[ControlState]) -> String {
    path.iter()
        .map(|state| state.name())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_the_path() {
        let err = TableError::AutoCycle(vec![
            ControlState::StartedSession,
            ControlState::RunningSession,
            ControlState::StartedSession,
        ]);
        assert_eq!(
            err.to_string(),
            "automatic follow-ups form a cycle: startedSession -> runningSession -> startedSession"
        );
    }

    #[test]
    fn table_errors_convert_into_core_errors() {
        let err: CoreError = TableError::MissingEntry(ControlState::EndedBreak).into();
        assert!(err.to_string().contains("endedBreak"));
    }
}
