//! Shape definitions for the drawing surface.

mod circle;
mod line;
mod pencil;
mod rectangle;

pub use circle::Circle;
pub use line::Line;
pub use pencil::Pencil;
pub use rectangle::Rectangle;

use crate::interaction::{Interaction, InteractionKind};
use crate::render::Surface;
use crate::selection::{Handle, HandleKind, hit_test_handles};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes. Opaque on the wire.
pub type ShapeId = String;

/// Generate a fresh shape id.
pub fn new_shape_id() -> ShapeId {
    Uuid::new_v4().to_string()
}

/// Style properties shared by every shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Stroke color as a CSS color string.
    pub color: String,
    /// Stroke width.
    pub stroke_width: f64,
}

impl ShapeStyle {
    pub fn new(color: impl Into<String>, stroke_width: f64) -> Self {
        Self {
            color: color.into(),
            stroke_width,
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new("#000000", 2.0)
    }
}

/// Common behavior of every shape variant.
///
/// Mutations return new values; the caller swaps them into the collection.
pub trait ShapeTrait {
    fn id(&self) -> &str;

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// World-space bounding box, `None` when the shape has no geometry.
    fn bounds(&self) -> Option<Rect>;

    /// Check if a world point hits this shape.
    fn contains(&self, point: Point) -> bool;

    /// Selection handles in world coordinates.
    fn handles(&self) -> Vec<Handle>;

    /// Handle under a world point, if any.
    fn handle_at(&self, point: Point) -> Option<HandleKind> {
        hit_test_handles(&self.handles(), point)
    }

    /// Reference point a drag keeps at a fixed offset from the pointer.
    fn anchor(&self) -> Point;

    /// Path used for rendering.
    fn to_path(&self) -> BezPath;

    /// Outline drawn around the shape while selected.
    fn selection_outline(&self) -> Option<BezPath> {
        self.bounds().map(|b| b.to_path(0.1))
    }

    /// Record the snapshots a resize of this variant needs.
    fn capture_resize(&self, _interaction: &mut Interaction, _mouse: Point) {}

    /// Shape with its anchor at `mouse - drag_offset`.
    fn moved(&self, mouse: Point, interaction: &Interaction) -> Self
    where
        Self: Sized;

    /// Shape after dragging the interaction's handle to `mouse`.
    fn resized(&self, mouse: Point, interaction: &Interaction) -> Self
    where
        Self: Sized;

    /// Shape while being drawn from `start` to `mouse`.
    fn grown(&self, mouse: Point, start: Point) -> Self
    where
        Self: Sized;
}

/// Shape variants, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Line),
    Pencil(Pencil),
}

/// Which variant a drawing tool creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Pencil,
}

impl Shape {
    /// Create a zero-size shape of `kind` at `at`, ready to be grown.
    pub fn new(kind: ShapeKind, at: Point, style: ShapeStyle) -> Self {
        match kind {
            ShapeKind::Rectangle => Shape::Rectangle(Rectangle::new(at, 0.0, 0.0).with_style(style)),
            ShapeKind::Circle => Shape::Circle(Circle::new(at, 0.0).with_style(style)),
            ShapeKind::Line => Shape::Line(Line::new(at, at).with_style(style)),
            ShapeKind::Pencil => Shape::Pencil(Pencil::from_points(vec![at]).with_style(style)),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Pencil(_) => ShapeKind::Pencil,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Line(s) => s.id(),
            Shape::Pencil(s) => s.id(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Circle(s) => s.style(),
            Shape::Line(s) => s.style(),
            Shape::Pencil(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Circle(s) => s.style_mut(),
            Shape::Line(s) => s.style_mut(),
            Shape::Pencil(s) => s.style_mut(),
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Pencil(s) => s.bounds(),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        match self {
            Shape::Rectangle(s) => s.contains(point),
            Shape::Circle(s) => s.contains(point),
            Shape::Line(s) => s.contains(point),
            Shape::Pencil(s) => s.contains(point),
        }
    }

    pub fn handles(&self) -> Vec<Handle> {
        match self {
            Shape::Rectangle(s) => s.handles(),
            Shape::Circle(s) => s.handles(),
            Shape::Line(s) => s.handles(),
            Shape::Pencil(s) => s.handles(),
        }
    }

    pub fn handle_at(&self, point: Point) -> Option<HandleKind> {
        match self {
            Shape::Rectangle(s) => s.handle_at(point),
            Shape::Circle(s) => s.handle_at(point),
            Shape::Line(s) => s.handle_at(point),
            Shape::Pencil(s) => s.handle_at(point),
        }
    }

    pub fn anchor(&self) -> Point {
        match self {
            Shape::Rectangle(s) => s.anchor(),
            Shape::Circle(s) => s.anchor(),
            Shape::Line(s) => s.anchor(),
            Shape::Pencil(s) => s.anchor(),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Line(s) => s.to_path(),
            Shape::Pencil(s) => s.to_path(),
        }
    }

    /// Rotation in radians (0 for variants that don't rotate).
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(r) => r.rotation,
            _ => 0.0,
        }
    }

    /// Whether the shape is worth keeping once drawing ends.
    pub fn is_visible(&self) -> bool {
        match self {
            Shape::Pencil(p) => p.points.len() >= 2,
            _ => true,
        }
    }

    /// Target this shape with a new drawing gesture.
    pub fn start_drawing(&self, interaction: &mut Interaction, mouse: Point) {
        interaction.begin(InteractionKind::Drawing, Some(self.id().to_owned()), mouse);
    }

    /// Target this shape with a drag that keeps the grab offset.
    pub fn start_dragging(&self, interaction: &mut Interaction, mouse: Point) {
        interaction.begin(InteractionKind::Dragging, Some(self.id().to_owned()), mouse);
        interaction.drag_offset = mouse - self.anchor();
    }

    /// Target this shape with a resize (or rotation) through `handle`.
    pub fn start_resizing(&self, interaction: &mut Interaction, handle: HandleKind, mouse: Point) {
        interaction.begin(InteractionKind::Resizing, Some(self.id().to_owned()), mouse);
        interaction.handle = Some(handle);
        match self {
            Shape::Rectangle(s) => s.capture_resize(interaction, mouse),
            Shape::Circle(s) => s.capture_resize(interaction, mouse),
            Shape::Line(s) => s.capture_resize(interaction, mouse),
            Shape::Pencil(s) => s.capture_resize(interaction, mouse),
        }
    }

    pub fn moved(&self, mouse: Point, interaction: &Interaction) -> Shape {
        match self {
            Shape::Rectangle(s) => Shape::Rectangle(s.moved(mouse, interaction)),
            Shape::Circle(s) => Shape::Circle(s.moved(mouse, interaction)),
            Shape::Line(s) => Shape::Line(s.moved(mouse, interaction)),
            Shape::Pencil(s) => Shape::Pencil(s.moved(mouse, interaction)),
        }
    }

    pub fn resized(&self, mouse: Point, interaction: &Interaction) -> Shape {
        match self {
            Shape::Rectangle(s) => Shape::Rectangle(s.resized(mouse, interaction)),
            Shape::Circle(s) => Shape::Circle(s.resized(mouse, interaction)),
            Shape::Line(s) => Shape::Line(s.resized(mouse, interaction)),
            Shape::Pencil(s) => Shape::Pencil(s.resized(mouse, interaction)),
        }
    }

    pub fn grown(&self, mouse: Point, start: Point) -> Shape {
        match self {
            Shape::Rectangle(s) => Shape::Rectangle(s.grown(mouse, start)),
            Shape::Circle(s) => Shape::Circle(s.grown(mouse, start)),
            Shape::Line(s) => Shape::Line(s.grown(mouse, start)),
            Shape::Pencil(s) => Shape::Pencil(s.grown(mouse, start)),
        }
    }

    /// Paint the shape itself.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let style = self.style();
        surface.stroke_path(&self.to_path(), &style.color, style.stroke_width);
    }

    /// Paint the selection outline and handles.
    pub fn draw_selection(&self, surface: &mut dyn Surface) {
        let outline = match self {
            Shape::Rectangle(s) => s.selection_outline(),
            Shape::Circle(s) => s.selection_outline(),
            Shape::Line(s) => s.selection_outline(),
            Shape::Pencil(s) => s.selection_outline(),
        };
        if let Some(outline) = outline {
            surface.stroke_selection(&outline);
        }
        for handle in self.handles() {
            surface.fill_handle(&handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rectangle_wire_format() {
        let json = json!({
            "type": "rectangle",
            "id": "r1",
            "x": 10, "y": 10, "width": 50, "height": 30,
            "color": "#ff0000",
            "strokeWidth": 3
        });
        let shape: Shape = serde_json::from_value(json).unwrap();
        let Shape::Rectangle(r) = &shape else {
            panic!("expected rectangle");
        };
        assert_eq!(r.id(), "r1");
        assert!((r.width - 50.0).abs() < f64::EPSILON);
        assert!((r.rotation - 0.0).abs() < f64::EPSILON);
        assert_eq!(r.style.color, "#ff0000");

        let out = serde_json::to_value(&shape).unwrap();
        assert_eq!(out["type"], "rectangle");
        assert_eq!(out["strokeWidth"], 3.0);
        assert_eq!(out["rotation"], 0.0);
    }

    #[test]
    fn test_pencil_wire_format() {
        let json = json!({
            "type": "pencil",
            "id": "p1",
            "points": [{"x": 1, "y": 2}, {"x": 3, "y": 4}],
            "color": "#000",
            "strokeWidth": 1
        });
        let shape: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Pencil);
        let out = serde_json::to_value(&shape).unwrap();
        assert_eq!(out["points"][1]["x"], 3.0);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let json = json!({"type": "hexagon", "id": "h", "color": "#000", "strokeWidth": 1});
        assert!(serde_json::from_value::<Shape>(json).is_err());
    }

    #[test]
    fn test_new_shapes_get_unique_ids() {
        let a = Shape::new(ShapeKind::Circle, Point::ZERO, ShapeStyle::default());
        let b = Shape::new(ShapeKind::Circle, Point::ZERO, ShapeStyle::default());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_start_dragging_records_offset() {
        let shape = Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 50.0, 30.0));
        let mut it = Interaction::default();
        shape.start_dragging(&mut it, Point::new(20.0, 15.0));
        assert_eq!(it.kind, InteractionKind::Dragging);
        assert!(it.targets(shape.id()));
        assert_eq!(it.drag_offset, kurbo::Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_pencil_visibility() {
        let dot = Shape::new(ShapeKind::Pencil, Point::ZERO, ShapeStyle::default());
        assert!(!dot.is_visible());
        let stroke = dot.grown(Point::new(1.0, 1.0), Point::ZERO);
        assert!(stroke.is_visible());
    }
}
