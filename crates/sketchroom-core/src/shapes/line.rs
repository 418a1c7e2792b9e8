//! Straight line segment.

use super::{ShapeId, ShapeStyle, ShapeTrait, new_shape_id};
use crate::geometry::{HIT_TOLERANCE, is_point_near_segment};
use crate::interaction::Interaction;
use crate::selection::{Handle, HandleKind};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A line from `(x1, y1)` to `(x2, y2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: new_shape_id(),
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
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

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

impl ShapeTrait for Line {
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
        Some(Rect::from_points(self.start(), self.end()))
    }

    fn contains(&self, point: Point) -> bool {
        is_point_near_segment(point, self.start(), self.end(), HIT_TOLERANCE)
    }

    fn handles(&self) -> Vec<Handle> {
        vec![
            Handle::new(self.start(), HandleKind::Start),
            Handle::new(self.end(), HandleKind::End),
        ]
    }

    fn anchor(&self) -> Point {
        self.start()
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());
        path
    }

    fn selection_outline(&self) -> Option<BezPath> {
        None
    }

    fn moved(&self, mouse: Point, interaction: &Interaction) -> Self {
        let start = mouse - interaction.drag_offset;
        let end = start + (self.end() - self.start());
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            ..self.clone()
        }
    }

    fn resized(&self, mouse: Point, interaction: &Interaction) -> Self {
        match interaction.handle {
            Some(HandleKind::Start) => Self {
                x1: mouse.x,
                y1: mouse.y,
                ..self.clone()
            },
            Some(HandleKind::End) => Self {
                x2: mouse.x,
                y2: mouse.y,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    fn grown(&self, mouse: Point, start: Point) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: mouse.x,
            y2: mouse.y,
            ..self.clone()
        }
    }
}
