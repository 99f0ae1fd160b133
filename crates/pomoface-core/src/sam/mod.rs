//! State-Action-Model control layer.
//!
//! ```text
//! Action --present--> Model --render--> Mode --> View
//!   ^                                     |
//!   +------------ follow-up action -------+
//! ```

mod action;
mod mode;
mod model;
mod table;
mod view;

pub use action::{Action, ControlState};
pub use mode::{DisplayMode, Effect, Mode, RegionValue, Representation};
pub use model::{Model, Transition};
pub use table::TransitionTable;
pub use view::{RecordingView, View};
