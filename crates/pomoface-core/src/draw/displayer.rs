//! The digital clock readout.

use super::arc_timer::Framing;
use crate::clock::{format_time, Alarm, Countdown};

/// Digital `H:MM:SS` readout that follows a clock.
///
/// Countdown readouts show the time left; elapsed readouts show the time
/// since the last restart.
#[derive(Debug, Clone)]
pub struct Displayer {
    clock: Countdown,
    framing: Framing,
    text: String,
    dirty: bool,
}

impl Displayer {
    pub fn new(framing: Framing) -> Self {
        Self {
            clock: Countdown::new(),
            framing,
            text: format_time(0.0),
            dirty: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The readout text if it changed since the last call.
    pub fn take_changed(&mut self) -> Option<String> {
        if self.dirty {
            self.dirty = false;
            Some(self.text.clone())
        } else {
            None
        }
    }

    pub fn update(&mut self, time: f64) {
        self.clock.sync(time);
        let value = match self.framing {
            Framing::Elapsed => self.clock.elapsed(),
            Framing::Countdown => self.clock.remaining(),
        };
        let text = format_time(value);
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }

    pub fn restart(&mut self, time: f64) {
        self.clock.reset(time);
        self.update(time);
    }

    pub fn countdown(&mut self, time: f64, duration: f64) -> Alarm {
        let alarm = self.clock.countdown(time, duration);
        self.update(time);
        alarm
    }
}
