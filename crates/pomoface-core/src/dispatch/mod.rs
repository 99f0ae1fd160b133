//! Callback registries fired by the frame loop.

mod dispatcher;
mod periodic;

pub use dispatcher::{Callback, Dispatcher, StepStatus};
pub use periodic::PeriodicDispatcher;
