//! Drawable clock-face components.

mod analog;
mod arc;
mod arc_timer;
mod displayer;
mod entity;
mod surface;

pub use analog::{Analog, AnalogConfig, AnalogKind};
pub use arc::Arc;
pub use arc_timer::{ArcTimer, ArcTimerConfig, Decoration, Framing};
pub use displayer::Displayer;
pub use entity::{Entity, Shape};
pub use surface::{ArcStroke, Color, DrawList, RecordingSurface, Surface};
