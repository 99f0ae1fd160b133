mod countdown;
mod format;
mod timer;

pub use countdown::{Alarm, AlarmState, Countdown};
pub use format::{coerce_duration, format_time, parse_minutes};
pub use timer::{now_ms, Timer};

/// One second in milliseconds.
pub const SECOND: f64 = 1000.0;
/// One minute in milliseconds.
pub const MINUTE: f64 = 60.0 * SECOND;
/// One hour in milliseconds.
pub const HOUR: f64 = 60.0 * MINUTE;
