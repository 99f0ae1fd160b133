//! Drawing surface contract and the per-frame draw list.
//!
//! The core never talks to a graphics API. Render callbacks append
//! [`ArcStroke`] commands to a [`DrawList`]; the frame loop clears the
//! [`Surface`] once and flushes the list onto it in order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA stroke colour, rendered as a CSS-style `rgba(...)` string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same colour with alpha clamped into `0.0..=1.0`.
    pub fn with_alpha(self, a: f64) -> Self {
        let a = if a.is_finite() { a.clamp(0.0, 1.0) } else { 0.0 };
        Self { a, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// One stroked arc, angles in radians.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcStroke {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub line_width: f64,
    pub stroke_style: String,
}

/// What the core needs from a 2D drawing backend.
pub trait Surface {
    /// Wipe everything drawn by the previous frame.
    fn clear(&mut self);

    /// Stroke an arc from `start_angle` to `end_angle`, clockwise.
    fn stroke_arc(&mut self, arc: &ArcStroke);
}

/// Ordered stroke commands collected during a render phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    strokes: Vec<ArcStroke>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stroke: ArcStroke) {
        self.strokes.push(stroke);
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn strokes(&self) -> &[ArcStroke] {
        &self.strokes
    }

    /// Clear `surface` and draw every stroke onto it, emptying the list.
    pub fn flush(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        for stroke in self.strokes.drain(..) {
            surface.stroke_arc(&stroke);
        }
    }
}

/// Surface that keeps the strokes of the most recent frame.
///
/// Used by headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    frame: Vec<ArcStroke>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strokes drawn since the last clear.
    pub fn frame(&self) -> &[ArcStroke] {
        &self.frame
    }

    /// How many frames have been started.
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.frame.clear();
        self.clears += 1;
    }

    fn stroke_arc(&mut self, arc: &ArcStroke) {
        self.frame.push(arc.clone());
    }
}
