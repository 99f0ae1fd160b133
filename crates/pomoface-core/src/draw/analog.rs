//! Composite analog clock faces.
//!
//! An [`Analog`] owns a background circle, hours/minutes/seconds sweeps, a
//! blinking cursor and a digital readout. Children are shared with the
//! callbacks registered on the [`Animator`], so they live behind
//! `Rc<RefCell<_>>`. Draw order is fixed: circle, hours, minutes, seconds,
//! cursor.
//!
//! The seconds sweep (and the cursor riding it) starts where the minutes
//! sweep ends. That offset is re-derived by [`Analog::style`] and by a
//! callback that runs once per `sync_interval_ms`.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use super::arc::Arc;
use super::arc_timer::{ArcTimer, ArcTimerConfig, Framing};
use super::displayer::Displayer;
use super::entity::{Entity, Shape};
use super::surface::DrawList;
use crate::animator::{Animator, Frame, FrameScheduler};
use crate::clock::Alarm;
use crate::config::DisplayConfig;
use crate::dispatch::Callback;

/// Which face an analog represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalogKind {
    /// Counts down a work session.
    Session,
    /// Counts down a break.
    Break,
    /// Counts up from the moment input mode began.
    Timer,
}

impl AnalogKind {
    pub fn framing(self) -> Framing {
        match self {
            AnalogKind::Session | AnalogKind::Break => Framing::Countdown,
            AnalogKind::Timer => Framing::Elapsed,
        }
    }
}

/// Per-child configuration of an [`Analog`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogConfig {
    pub kind: AnalogKind,
    /// Static dial background; `None` draws no background.
    pub circle: Option<Shape>,
    pub hours: ArcTimerConfig,
    pub minutes: ArcTimerConfig,
    pub seconds: ArcTimerConfig,
    pub cursor: ArcTimerConfig,
    /// Period of the seconds-offset resync. Default: 1000 ms.
    pub sync_interval_ms: u64,
}

impl AnalogConfig {
    /// Build the face for `kind` from display settings.
    ///
    /// Rings from the outside in: hours, minutes, seconds (with the cursor
    /// on the seconds ring). The background band spans all three.
    pub fn from_display(kind: AnalogKind, display: &DisplayConfig) -> Self {
        let framing = kind.framing();
        let color = match kind {
            AnalogKind::Session => display.session_color,
            AnalogKind::Break => display.break_color,
            AnalogKind::Timer => display.timer_color,
        };
        let (x, y) = (display.center_x, display.center_y);
        let width = display.line_width;
        let ring = |step: f64| Shape::new(x, y, display.radius - step * width, width, color);

        Self {
            kind,
            circle: Some(Shape::new(
                x,
                y,
                display.radius - width,
                3.0 * width,
                display.background_color,
            )),
            hours: ArcTimerConfig::hours(ring(0.0), framing, display.opacity_step),
            minutes: ArcTimerConfig::minutes(ring(1.0), framing),
            seconds: ArcTimerConfig::seconds(ring(2.0), framing),
            cursor: ArcTimerConfig::cursor(ring(2.0), framing, display.cursor_off_color, display.cursor_wedge),
            sync_interval_ms: 1000,
        }
    }
}

struct Registration {
    update: Callback<Frame>,
    interval: u64,
    render: Option<Callback<DrawList>>,
}

/// A composite clock face driven by a shared [`Animator`].
pub struct Analog {
    kind: AnalogKind,
    circle: Option<Rc<RefCell<Arc>>>,
    hours: Rc<RefCell<ArcTimer>>,
    minutes: Rc<RefCell<ArcTimer>>,
    seconds: Rc<RefCell<ArcTimer>>,
    cursor: Rc<RefCell<ArcTimer>>,
    readout: Rc<RefCell<Displayer>>,
    sync_interval_ms: u64,
    registrations: Vec<Registration>,
}

impl Analog {
    pub fn new(config: AnalogConfig) -> Self {
        let shared = |c: ArcTimerConfig| Rc::new(RefCell::new(ArcTimer::new(c)));
        Self {
            kind: config.kind,
            circle: config.circle.map(|shape| Rc::new(RefCell::new(Arc::circle(shape)))),
            hours: shared(config.hours),
            minutes: shared(config.minutes),
            seconds: shared(config.seconds),
            cursor: shared(config.cursor),
            readout: Rc::new(RefCell::new(Displayer::new(config.kind.framing()))),
            sync_interval_ms: config.sync_interval_ms,
            registrations: Vec::new(),
        }
    }

    pub fn kind(&self) -> AnalogKind {
        self.kind
    }

    pub fn is_animated(&self) -> bool {
        !self.registrations.is_empty()
    }

    pub fn readout(&self) -> String {
        self.readout.borrow().text().to_string()
    }

    /// Readout text if it changed since the last call.
    pub fn take_readout_change(&self) -> Option<String> {
        self.readout.borrow_mut().take_changed()
    }

    pub fn seconds_rotation(&self) -> f64 {
        self.seconds.borrow().rotation()
    }

    pub fn minutes_end_angle(&self) -> f64 {
        self.minutes.borrow().end_angle()
    }

    /// Bring every child to `time`, then re-anchor the seconds sweep.
    pub fn style(&self, time: f64) {
        if let Some(circle) = &self.circle {
            circle.borrow_mut().update(time);
        }
        for child in [&self.hours, &self.minutes, &self.seconds, &self.cursor] {
            child.borrow_mut().update(time);
        }
        self.readout.borrow_mut().update(time);
        anchor_seconds(&self.minutes, &self.seconds, &self.cursor);
    }

    /// Append every child's strokes, background first.
    pub fn render(&self, list: &mut DrawList) {
        if let Some(circle) = &self.circle {
            circle.borrow().draw(list);
        }
        for child in [&self.hours, &self.minutes, &self.seconds, &self.cursor] {
            child.borrow().draw(list);
        }
    }

    /// Register per-child update and render callbacks with `animator`.
    ///
    /// No-op while already animated.
    pub fn animate<S: FrameScheduler>(&mut self, animator: &mut Animator<S>) {
        if self.is_animated() {
            return;
        }
        if let Some(circle) = &self.circle {
            self.registrations.push(entity_registration(circle));
        }
        for child in [&self.hours, &self.minutes, &self.seconds, &self.cursor] {
            self.registrations.push(entity_registration(child));
        }

        let readout = Rc::clone(&self.readout);
        self.registrations.push(Registration {
            update: Callback::function(move |frame: &mut Frame| readout.borrow_mut().update(frame.time)),
            interval: 0,
            render: None,
        });

        let (minutes, seconds, cursor) = (
            Rc::clone(&self.minutes),
            Rc::clone(&self.seconds),
            Rc::clone(&self.cursor),
        );
        self.registrations.push(Registration {
            update: Callback::function(move |_: &mut Frame| anchor_seconds(&minutes, &seconds, &cursor)),
            interval: self.sync_interval_ms,
            render: None,
        });

        for registration in &self.registrations {
            animator.add_update(registration.update.clone(), registration.interval);
            if let Some(render) = &registration.render {
                animator.add_render(render.clone());
            }
        }
        tracing::debug!(kind = ?self.kind, "analog animated");
    }

    /// Withdraw every callback registered by [`Analog::animate`].
    pub fn deanimate<S: FrameScheduler>(&mut self, animator: &mut Animator<S>) {
        for registration in self.registrations.drain(..) {
            animator.remove_update(&registration.update, registration.interval);
            if let Some(render) = &registration.render {
                animator.remove_render(render);
            }
        }
    }

    /// Restart the face as a countdown of `duration` ms on `animator`'s clock.
    pub fn countdown<S: FrameScheduler>(&mut self, duration: f64, animator: &mut Animator<S>) -> Alarm {
        self.deanimate(animator);
        let start = animator.now();
        let alarm = animator.countdown(duration);
        for child in [&self.hours, &self.minutes, &self.seconds, &self.cursor] {
            child.borrow_mut().countdown(start, duration);
        }
        self.readout.borrow_mut().countdown(start, duration);
        self.style(start);
        self.animate(animator);
        alarm
    }

    /// Restart the face counting up from now.
    pub fn restart<S: FrameScheduler>(&mut self, animator: &mut Animator<S>) {
        self.deanimate(animator);
        let start = animator.now();
        for child in [&self.hours, &self.minutes, &self.seconds, &self.cursor] {
            child.borrow_mut().restart(start);
        }
        self.readout.borrow_mut().restart(start);
        self.style(start);
        self.animate(animator);
    }
}

fn entity_registration<E: Entity + 'static>(entity: &Rc<RefCell<E>>) -> Registration {
    let updated = Rc::clone(entity);
    let drawn = Rc::clone(entity);
    Registration {
        update: Callback::function(move |frame: &mut Frame| updated.borrow_mut().update(frame.time)),
        interval: 0,
        render: Some(Callback::function(move |list: &mut DrawList| drawn.borrow().draw(list))),
    }
}

fn anchor_seconds(
    minutes: &Rc<RefCell<ArcTimer>>,
    seconds: &Rc<RefCell<ArcTimer>>,
    cursor: &Rc<RefCell<ArcTimer>>,
) {
    let anchor = minutes.borrow().end_angle();
    seconds.borrow_mut().set_rotation(anchor);
    cursor.borrow_mut().set_rotation(anchor);
}
