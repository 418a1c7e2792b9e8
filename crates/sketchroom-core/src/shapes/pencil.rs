//! Freehand pencil stroke.

use super::{ShapeId, ShapeStyle, ShapeTrait, new_shape_id};
use crate::geometry::{HIT_TOLERANCE, MIN_SHAPE_SIZE, is_point_near_segment, points_bounds};
use crate::interaction::Interaction;
use crate::selection::{Handle, box_handles};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A freehand drawing (series of points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pencil {
    pub(crate) id: ShapeId,
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Pencil {
    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: new_shape_id(),
            points,
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
}

/// Map `p` from `from` to `to` along one axis. A flat source axis only translates.
fn remap(p: f64, from0: f64, from_len: f64, to0: f64, to_len: f64) -> f64 {
    if from_len.abs() < f64::EPSILON {
        return to0 + (p - from0);
    }
    to0 + (p - from0) * (to_len / from_len)
}

impl ShapeTrait for Pencil {
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
        points_bounds(&self.points)
    }

    fn contains(&self, point: Point) -> bool {
        self.points
            .windows(2)
            .any(|w| is_point_near_segment(point, w[0], w[1], HIT_TOLERANCE))
    }

    fn handles(&self) -> Vec<Handle> {
        self.bounds().map(box_handles).unwrap_or_default()
    }

    fn anchor(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
        }
        path
    }

    fn capture_resize(&self, interaction: &mut Interaction, _mouse: Point) {
        interaction.initial_points = self.points.clone();
        interaction.initial_bounds = self.bounds();
    }

    fn moved(&self, mouse: Point, interaction: &Interaction) -> Self {
        let Some(first) = self.points.first() else {
            return self.clone();
        };
        let delta = (mouse - interaction.drag_offset) - *first;
        Self {
            points: self.points.iter().map(|p| *p + delta).collect(),
            ..self.clone()
        }
    }

    fn resized(&self, mouse: Point, interaction: &Interaction) -> Self {
        let (Some(handle), Some(old)) = (interaction.handle, interaction.initial_bounds) else {
            return self.clone();
        };
        let sides = handle.sides();
        let (mut left, mut top, mut right, mut bottom) = (old.x0, old.y0, old.x1, old.y1);
        if sides.left {
            left = mouse.x.min(right - MIN_SHAPE_SIZE);
        }
        if sides.right {
            right = mouse.x.max(left + MIN_SHAPE_SIZE);
        }
        if sides.top {
            top = mouse.y.min(bottom - MIN_SHAPE_SIZE);
        }
        if sides.bottom {
            bottom = mouse.y.max(top + MIN_SHAPE_SIZE);
        }
        let points = interaction
            .initial_points
            .iter()
            .map(|p| {
                Point::new(
                    remap(p.x, old.x0, old.width(), left, right - left),
                    remap(p.y, old.y0, old.height(), top, bottom - top),
                )
            })
            .collect();
        Self {
            points,
            ..self.clone()
        }
    }

    fn grown(&self, mouse: Point, _start: Point) -> Self {
        let mut points = self.points.clone();
        points.push(mouse);
        Self {
            points,
            ..self.clone()
        }
    }
}
