//! Shared shape styling and the drawable-entity seam.

use serde::{Deserialize, Serialize};

use super::surface::{Color, DrawList};

/// Anything the frame loop can advance and draw.
pub trait Entity {
    /// Recompute time-driven state for `time` (ms).
    fn update(&mut self, time: f64);

    /// Append this entity's strokes to `list`.
    fn draw(&self, list: &mut DrawList);
}

/// Position and stroke styling common to every shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub line_width: f64,
    pub stroke: Color,
}

impl Shape {
    /// Negative sizes are clamped to zero.
    pub fn new(center_x: f64, center_y: f64, radius: f64, line_width: f64, stroke: Color) -> Self {
        Self {
            center_x,
            center_y,
            radius: radius.max(0.0),
            line_width: line_width.max(0.0),
            stroke,
        }
    }
}
