//! Plain stroked arcs.

use std::f64::consts::TAU;

use super::entity::{Entity, Shape};
use super::surface::{ArcStroke, Color, DrawList};

/// A stroked circular arc.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    shape: Shape,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    pub fn new(shape: Shape, start_angle: f64, end_angle: f64) -> Self {
        Self {
            shape,
            start_angle,
            end_angle,
        }
    }

    /// A full circle; used as the static dial background.
    pub fn circle(shape: Shape) -> Self {
        Self::new(shape, 0.0, TAU)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn center(&self) -> (f64, f64) {
        (self.shape.center_x, self.shape.center_y)
    }

    pub fn set_center(&mut self, x: f64, y: f64) {
        self.shape.center_x = x;
        self.shape.center_y = y;
    }

    pub fn radius(&self) -> f64 {
        self.shape.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.shape.radius = radius.max(0.0);
    }

    pub fn line_width(&self) -> f64 {
        self.shape.line_width
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.shape.line_width = width.max(0.0);
    }

    pub fn stroke(&self) -> Color {
        self.shape.stroke
    }

    pub fn set_stroke(&mut self, stroke: Color) {
        self.shape.stroke = stroke;
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn set_start_angle(&mut self, angle: f64) {
        self.start_angle = angle;
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn set_end_angle(&mut self, angle: f64) {
        self.end_angle = angle;
    }

    /// The stroke command for the current geometry.
    pub fn to_stroke(&self) -> ArcStroke {
        ArcStroke {
            center_x: self.shape.center_x,
            center_y: self.shape.center_y,
            radius: self.shape.radius,
            start_angle: self.start_angle,
            end_angle: self.end_angle,
            line_width: self.shape.line_width,
            stroke_style: self.shape.stroke.to_string(),
        }
    }
}

impl Entity for Arc {
    fn update(&mut self, _time: f64) {}

    fn draw(&self, list: &mut DrawList) {
        list.push(self.to_stroke());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_emits_current_geometry() {
        let mut arc = Arc::new(Shape::new(10.0, 20.0, 30.0, 4.0, Color::rgb(9, 9, 9)), 0.5, 1.5);
        arc.set_end_angle(2.0);
        arc.set_center(11.0, 21.0);

        let mut list = DrawList::new();
        arc.draw(&mut list);
        let stroke = &list.strokes()[0];
        assert_eq!((stroke.center_x, stroke.center_y), (11.0, 21.0));
        assert_eq!(stroke.radius, 30.0);
        assert_eq!((stroke.start_angle, stroke.end_angle), (0.5, 2.0));
        assert_eq!(stroke.line_width, 4.0);
        assert_eq!(stroke.stroke_style, "rgba(9, 9, 9, 1)");
    }

    #[test]
    fn setters_clamp_sizes() {
        let mut arc = Arc::circle(Shape::new(0.0, 0.0, -1.0, -2.0, Color::rgb(0, 0, 0)));
        assert_eq!(arc.radius(), 0.0);
        assert_eq!(arc.line_width(), 0.0);
        arc.set_radius(-5.0);
        assert_eq!(arc.radius(), 0.0);
        assert_eq!(arc.end_angle(), TAU);
    }
}
