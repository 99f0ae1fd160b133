//! Time-driven arcs.
//!
//! An [`ArcTimer`] sweeps its end angle away from a fixed rotation offset as
//! time passes:
//!
//! ```text
//! units    = elapsed / time_unit
//! degrees  = 360 / units_per_rotation * units
//! end      = rotation + radians(degrees) mod 2π
//! ```
//!
//! A negative `units_per_rotation` sweeps counter-clockwise, which is how
//! countdown dials show the time that is left.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

use super::arc::Arc;
use super::entity::{Entity, Shape};
use super::surface::{Color, DrawList};
use crate::clock::{Alarm, Countdown, HOUR, MINUTE, SECOND};

/// Whether the arc measures time since a start or the window of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// Sweeps clockwise forever.
    Elapsed,
    /// Sweeps counter-clockwise and stops once the countdown is over.
    Countdown,
}

impl Framing {
    fn direction(self) -> f64 {
        match self {
            Framing::Elapsed => 1.0,
            Framing::Countdown => -1.0,
        }
    }
}

/// Extra per-update styling layered on top of the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration {
    Plain,
    /// Alpha = whole hours remaining × `opacity_step`.
    RemainingHours { opacity_step: f64 },
    /// Thin wedge at the sweep tip, alternating colour every second.
    Blink { off: Color, wedge: f64 },
}

/// Construction parameters for an [`ArcTimer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcTimerConfig {
    pub shape: Shape,
    /// Milliseconds per unit. Default: one second.
    pub time_unit: f64,
    /// Units per full turn; the sign picks the direction. Default: 60.
    pub units_per_rotation: f64,
    /// Angle the sweep starts from. Default: twelve o'clock (-π/2).
    pub rotation: f64,
    /// Default: [`Framing::Elapsed`].
    pub framing: Framing,
    /// Default: [`Decoration::Plain`].
    pub decoration: Decoration,
}

impl ArcTimerConfig {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            time_unit: SECOND,
            units_per_rotation: 60.0,
            rotation: -FRAC_PI_2,
            framing: Framing::Elapsed,
            decoration: Decoration::Plain,
        }
    }

    /// Twelve hours per turn, faded by the whole hours left.
    pub fn hours(shape: Shape, framing: Framing, opacity_step: f64) -> Self {
        Self {
            time_unit: HOUR,
            units_per_rotation: 12.0 * framing.direction(),
            framing,
            decoration: match framing {
                Framing::Countdown => Decoration::RemainingHours { opacity_step },
                Framing::Elapsed => Decoration::Plain,
            },
            ..Self::new(shape)
        }
    }

    /// Sixty minutes per turn.
    pub fn minutes(shape: Shape, framing: Framing) -> Self {
        Self {
            time_unit: MINUTE,
            units_per_rotation: 60.0 * framing.direction(),
            framing,
            ..Self::new(shape)
        }
    }

    /// Sixty seconds per turn.
    pub fn seconds(shape: Shape, framing: Framing) -> Self {
        Self {
            units_per_rotation: 60.0 * framing.direction(),
            framing,
            ..Self::new(shape)
        }
    }

    /// A blinking wedge riding the seconds sweep.
    pub fn cursor(shape: Shape, framing: Framing, off: Color, wedge: f64) -> Self {
        Self {
            decoration: Decoration::Blink { off, wedge },
            ..Self::seconds(shape, framing)
        }
    }
}

/// An [`Arc`] whose extent follows a clock.
#[derive(Debug, Clone)]
pub struct ArcTimer {
    arc: Arc,
    clock: Countdown,
    base: Color,
    time_unit: f64,
    units_per_rotation: f64,
    rotation: f64,
    framing: Framing,
    decoration: Decoration,
}

impl ArcTimer {
    pub fn new(config: ArcTimerConfig) -> Self {
        Self {
            arc: Arc::new(config.shape, config.rotation, config.rotation),
            clock: Countdown::new(),
            base: config.shape.stroke,
            time_unit: config.time_unit,
            units_per_rotation: config.units_per_rotation,
            rotation: config.rotation,
            framing: config.framing,
            decoration: config.decoration,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn arc(&self) -> &Arc {
        &self.arc
    }

    pub fn end_angle(&self) -> f64 {
        self.arc.end_angle()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn clock(&self) -> &Countdown {
        &self.clock
    }

    /// Time the sweep is based on; countdowns stop at their duration.
    pub fn elapsed(&self) -> f64 {
        match self.framing {
            Framing::Elapsed => self.clock.elapsed(),
            Framing::Countdown => self.clock.elapsed().min(self.clock.duration()),
        }
    }

    pub fn remaining(&self) -> f64 {
        self.clock.remaining()
    }

    /// Angle swept so far, within one turn.
    pub fn travelled(&self) -> f64 {
        if self.time_unit <= 0.0 || self.units_per_rotation == 0.0 {
            return 0.0;
        }
        let units = self.elapsed() / self.time_unit;
        let degrees = 360.0 / self.units_per_rotation * units;
        degrees.to_radians() % TAU
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Restart the sweep from zero at `time`.
    pub fn restart(&mut self, time: f64) {
        self.clock.reset(time);
        self.update(time);
    }

    /// Arm a countdown of `duration` starting at `time`.
    pub fn countdown(&mut self, time: f64, duration: f64) -> Alarm {
        let alarm = self.clock.countdown(time, duration);
        self.update(time);
        alarm
    }

    /// Move the angle the sweep grows from, carrying the current sweep along.
    pub fn set_rotation(&mut self, angle: f64) {
        let shift = angle - self.rotation;
        self.rotation = angle;
        self.arc.set_start_angle(self.arc.start_angle() + shift);
        self.arc.set_end_angle(self.arc.end_angle() + shift);
    }

    fn decorate(&mut self) {
        match self.decoration {
            Decoration::Plain => {}
            Decoration::RemainingHours { opacity_step } => {
                let hours_left = (self.clock.remaining() / HOUR).floor();
                self.arc.set_stroke(self.base.with_alpha(hours_left * opacity_step));
            }
            Decoration::Blink { off, wedge } => {
                // Strokes run clockwise from start to end, whatever the sweep direction.
                let tip = self.arc.end_angle();
                self.arc.set_start_angle(tip - wedge);
                let tick = (self.elapsed() / SECOND).floor() as i64;
                self.arc
                    .set_stroke(if tick % 2 == 0 { self.base } else { off });
            }
        }
    }
}

impl Entity for ArcTimer {
    fn update(&mut self, time: f64) {
        self.clock.sync(time);
        let travelled = self.travelled();
        self.arc.set_start_angle(self.rotation);
        self.arc.set_end_angle(self.rotation + travelled);
        self.decorate();
    }

    fn draw(&self, list: &mut DrawList) {
        self.arc.draw(list);
    }
}
