//! Circle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, new_shape_id};
use crate::geometry::{MIN_SHAPE_SIZE, distance, is_point_in_circle};
use crate::interaction::Interaction;
use crate::selection::{Handle, HandleKind};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle defined by center and radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center.
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: new_shape_id(),
            x: center.x,
            y: center.y,
            radius,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_id(mut self, id: impl Into<ShapeId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> &str {
        &self.id
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn bounds(&self) -> Option<Rect> {
        let r = self.radius;
        Some(Rect::new(self.x - r, self.y - r, self.x + r, self.y + r))
    }

    fn contains(&self, point: Point) -> bool {
        is_point_in_circle(point, self.center(), self.radius)
    }

    fn handles(&self) -> Vec<Handle> {
        vec![Handle::new(
            Point::new(self.x + self.radius, self.y),
            HandleKind::Radius,
        )]
    }

    fn anchor(&self) -> Point {
        self.center()
    }

    fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center(), self.radius).to_path(0.1)
    }

    fn moved(&self, mouse: Point, interaction: &Interaction) -> Self {
        let center = mouse - interaction.drag_offset;
        Self {
            x: center.x,
            y: center.y,
            ..self.clone()
        }
    }

    fn resized(&self, mouse: Point, _interaction: &Interaction) -> Self {
        Self {
            radius: distance(self.center(), mouse).max(MIN_SHAPE_SIZE),
            ..self.clone()
        }
    }

    fn grown(&self, mouse: Point, start: Point) -> Self {
        Self {
            x: start.x,
            y: start.y,
            radius: distance(start, mouse),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    #[test]
    fn test_circle_contains_boundary() {
        let c = Circle::new(Point::new(50.0, 50.0), 10.0);
        assert!(c.contains(Point::new(60.0, 50.0)));
        assert!(!c.contains(Point::new(60.5, 50.0)));
    }

    #[test]
    fn test_radius_handle() {
        let c = Circle::new(Point::new(50.0, 50.0), 30.0);
        assert_eq!(c.handle_at(Point::new(82.0, 52.0)), Some(HandleKind::Radius));
        assert_eq!(c.handle_at(Point::new(50.0, 80.0)), None);
    }

    #[test]
    fn test_resize_floors_radius() {
        let c = Circle::new(Point::new(50.0, 50.0), 30.0);
        let it = Interaction::default();
        let out = c.resized(Point::new(52.0, 50.0), &it);
        assert!((out.radius - MIN_SHAPE_SIZE).abs() < f64::EPSILON);
        let out = c.resized(Point::new(50.0, 90.0), &it);
        assert!((out.radius - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grown_keeps_center() {
        let c = Circle::new(Point::new(10.0, 10.0), 0.0);
        let out = c.grown(Point::new(13.0, 14.0), Point::new(10.0, 10.0));
        assert_eq!(out.center(), Point::new(10.0, 10.0));
        assert!((out.radius - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_moved_idempotent() {
        let c = Circle::new(Point::new(10.0, 10.0), 5.0);
        let it = Interaction {
            drag_offset: Vec2::new(2.0, -1.0),
            ..Default::default()
        };
        let once = c.moved(Point::new(30.0, 30.0), &it);
        assert_eq!(once, once.moved(Point::new(30.0, 30.0), &it));
        assert_eq!(once.center(), Point::new(28.0, 31.0));
    }
}
