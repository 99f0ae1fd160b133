//! Digital readout formatting and duration input coercion.

use super::{HOUR, MINUTE, SECOND};

/// Format milliseconds as `H:MM:SS`.
///
/// Hours are unpadded and always `floor(ms / HOUR)`. The sub-second
/// remainder rounds to the nearest second, except that a positive value
/// never shows `0:00:00` and rounding never carries into the next hour.
pub fn format_time(ms: f64) -> String {
    let ms = coerce_duration(ms);
    let hours = (ms / HOUR).floor() as u64;

    let mut total_secs = (ms / SECOND).round() as u64;
    if total_secs == 0 && ms > 0.0 {
        total_secs = 1;
    }
    let hour_floor = hours * 3600;
    let total_secs = total_secs.clamp(hour_floor, hour_floor + 3599);

    let within_hour = total_secs - hour_floor;
    format!("{}:{:02}:{:02}", hours, within_hour / 60, within_hour % 60)
}

/// Clamp a duration to a non-negative finite number of milliseconds.
pub fn coerce_duration(ms: f64) -> f64 {
    if ms.is_finite() && ms > 0.0 {
        ms
    } else {
        0.0
    }
}

/// Parse a minutes field (as typed by a user) into milliseconds.
///
/// Anything that is not a non-negative number yields `0`.
pub fn parse_minutes(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .map(|minutes| coerce_duration(minutes * MINUTE))
        .unwrap_or(0.0)
}
