//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, new_shape_id};
use crate::geometry::{MIN_SHAPE_SIZE, is_point_in_rect, points_bounds, rotate_point, rotate_vec};
use crate::interaction::Interaction;
use crate::selection::{Handle, HandleKind, ROTATE_HANDLE_OFFSET, box_handles, hit_test_handles};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A rectangle, optionally rotated about its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner before rotation.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: new_shape_id(),
            x: position.x,
            y: position.y,
            width,
            height,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min = Point::new(p1.x.min(p2.x), p1.y.min(p2.y));
        Self::new(min, (p2.x - p1.x).abs(), (p2.y - p1.y).abs())
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_id(mut self, id: impl Into<ShapeId>) -> Self {
        self.id = id.into();
        self
    }

    /// The rectangle in its own unrotated frame.
    pub fn local_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        self.local_rect().center()
    }

    /// Handles in the unrotated frame, rotate handle last.
    fn local_handles(&self) -> Vec<Handle> {
        let rect = self.local_rect();
        let mut handles = box_handles(rect);
        handles.push(Handle::new(
            Point::new(rect.center().x, rect.y0 - ROTATE_HANDLE_OFFSET),
            HandleKind::Rotate,
        ));
        handles
    }

    fn to_world(&self, point: Point) -> Point {
        rotate_point(point, self.center(), self.rotation)
    }

    fn to_local(&self, point: Point) -> Point {
        rotate_point(point, self.center(), -self.rotation)
    }

    fn rotated(&self, mouse: Point, interaction: &Interaction) -> Self {
        let center = interaction
            .initial_bounds
            .map(|b| b.center())
            .unwrap_or_else(|| self.center());
        let angle = (mouse.y - center.y).atan2(mouse.x - center.x);
        Self {
            rotation: interaction.start_rotation + angle - interaction.initial_angle,
            ..self.clone()
        }
    }
}

impl ShapeTrait for Rectangle {
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
        if self.rotation == 0.0 {
            return Some(self.local_rect());
        }
        let r = self.local_rect();
        let corners = [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ]
        .map(|p| self.to_world(p));
        points_bounds(&corners)
    }

    fn contains(&self, point: Point) -> bool {
        is_point_in_rect(self.to_local(point), self.local_rect())
    }

    fn handles(&self) -> Vec<Handle> {
        self.local_handles()
            .into_iter()
            .map(|h| Handle::new(self.to_world(h.position), h.kind))
            .collect()
    }

    fn handle_at(&self, point: Point) -> Option<HandleKind> {
        hit_test_handles(&self.local_handles(), self.to_local(point))
    }

    fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn to_path(&self) -> BezPath {
        let path = self.local_rect().to_path(0.1);
        if self.rotation == 0.0 {
            return path;
        }
        Affine::rotate_about(self.rotation, self.center()) * path
    }

    fn selection_outline(&self) -> Option<BezPath> {
        let mut outline = self.to_path();
        let top = self.local_rect();
        outline.move_to(self.to_world(Point::new(top.center().x, top.y0)));
        outline.line_to(self.to_world(Point::new(top.center().x, top.y0 - ROTATE_HANDLE_OFFSET)));
        Some(outline)
    }

    fn capture_resize(&self, interaction: &mut Interaction, mouse: Point) {
        let center = self.center();
        interaction.initial_bounds = Some(self.local_rect());
        interaction.start_rotation = self.rotation;
        interaction.initial_angle = (mouse.y - center.y).atan2(mouse.x - center.x);
    }

    fn moved(&self, mouse: Point, interaction: &Interaction) -> Self {
        let anchor = mouse - interaction.drag_offset;
        Self {
            x: anchor.x,
            y: anchor.y,
            ..self.clone()
        }
    }

    fn resized(&self, mouse: Point, interaction: &Interaction) -> Self {
        let Some(handle) = interaction.handle else {
            return self.clone();
        };
        if handle == HandleKind::Rotate {
            return self.rotated(mouse, interaction);
        }
        let sides = handle.sides();
        let initial = interaction.initial_bounds.unwrap_or_else(|| self.local_rect());
        let center = initial.center();
        let local = rotate_point(mouse, center, -self.rotation);

        let (mut left, mut top, mut right, mut bottom) = (initial.x0, initial.y0, initial.x1, initial.y1);
        if sides.left {
            left = local.x.min(right - MIN_SHAPE_SIZE);
        }
        if sides.right {
            right = local.x.max(left + MIN_SHAPE_SIZE);
        }
        if sides.top {
            top = local.y.min(bottom - MIN_SHAPE_SIZE);
        }
        if sides.bottom {
            bottom = local.y.max(top + MIN_SHAPE_SIZE);
        }
        // An axis the handle doesn't drag still honors the floor, about its middle.
        if right - left < MIN_SHAPE_SIZE {
            let mid = (left + right) / 2.0;
            left = mid - MIN_SHAPE_SIZE / 2.0;
            right = mid + MIN_SHAPE_SIZE / 2.0;
        }
        if bottom - top < MIN_SHAPE_SIZE {
            let mid = (top + bottom) / 2.0;
            top = mid - MIN_SHAPE_SIZE / 2.0;
            bottom = mid + MIN_SHAPE_SIZE / 2.0;
        }

        let width = right - left;
        let height = bottom - top;
        let local_center = Point::new((left + right) / 2.0, (top + bottom) / 2.0);
        let world_center = center + rotate_vec(local_center - center, self.rotation);
        Self {
            x: world_center.x - width / 2.0,
            y: world_center.y - height / 2.0,
            width,
            height,
            ..self.clone()
        }
    }

    fn grown(&self, mouse: Point, start: Point) -> Self {
        let r = Rect::from_points(start, mouse);
        Self {
            x: r.x0,
            y: r.y0,
            width: r.width(),
            height: r.height(),
            ..self.clone()
        }
    }
}
