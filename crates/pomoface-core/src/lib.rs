//! # Pomoface Core Library
//!
//! This library provides the core logic for the Pomoface visual countdown
//! timer: a session/break cycle drawn as concentric arcs that sweep with
//! the remaining time. It knows nothing about any particular graphics API
//! or page; hosts plug in a drawing [`Surface`], a [`View`] and a
//! [`FrameScheduler`], then feed it display refreshes and user intents.
//!
//! ## Architecture
//!
//! - **Clock**: monotonic [`Timer`] and [`Countdown`] with a single
//!   completion [`Alarm`]
//! - **Dispatch**: ordered callback registries, optionally grouped by period
//! - **Animator**: frame loop pacing update and render phases
//! - **Draw**: arcs, arc timers and the composite [`Analog`] clock face
//! - **SAM**: action/model/mode state machine over an explicit allow-list
//!
//! ## Key Components
//!
//! - [`Pomodoro`]: Composition root wiring model, view and faces
//! - [`Animator`]: Display-refresh driven frame loop
//! - [`Model`]: Control state and durations
//! - [`Config`]: Application configuration management

pub mod animator;
pub mod app;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod draw;
pub mod error;
pub mod events;
pub mod sam;

pub use animator::{Animator, Frame, FrameHandle, FrameScheduler, HostFrames};
pub use app::Pomodoro;
pub use clock::{format_time, Alarm, AlarmState, Countdown, Timer};
pub use config::Config;
pub use dispatch::{Callback, Dispatcher, PeriodicDispatcher, StepStatus};
pub use draw::{Analog, AnalogKind, ArcStroke, DrawList, RecordingSurface, Surface};
pub use error::{ConfigError, CoreError, TableError};
pub use events::Event;
pub use sam::{Action, ControlState, Mode, Model, RecordingView, Transition, TransitionTable, View};
