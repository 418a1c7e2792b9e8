//! Transient gesture state.
//!
//! One [`Interaction`] lives inside the editor. It records which shape a
//! pointer gesture targets and the snapshots taken at pointer-down, so that
//! every pointer-move can recompute the shape from a fixed origin instead of
//! accumulating deltas.

use crate::selection::HandleKind;
use crate::shapes::ShapeId;
use kurbo::{Point, Rect, Vec2};

/// What the current gesture is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionKind {
    #[default]
    Idle,
    Drawing,
    Dragging,
    Resizing,
    Panning,
}

/// Gesture state shared by the editor and the shape model.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    pub kind: InteractionKind,
    /// Targeted shape. Survives [`Interaction::finish`] as the selection.
    pub shape: Option<ShapeId>,
    pub handle: Option<HandleKind>,
    /// Pointer position minus the shape's anchor at pointer-down.
    pub drag_offset: Vec2,
    pub start_point: Point,
    /// Pointer angle about the shape center when a rotation began.
    pub initial_angle: f64,
    pub start_rotation: f64,
    pub initial_points: Vec<Point>,
    /// Unrotated box captured at pointer-down (rectangles and strokes).
    pub initial_bounds: Option<Rect>,
    /// Camera offset when panning began.
    pub pan_origin: Vec2,
    /// Whether the gesture has mutated its target yet.
    pub changed: bool,
}

impl Interaction {
    /// Start a fresh gesture, dropping every snapshot from the previous one.
    pub(crate) fn begin(&mut self, kind: InteractionKind, shape: Option<ShapeId>, mouse: Point) {
        *self = Self {
            kind,
            shape,
            start_point: mouse,
            ..Self::default()
        };
    }

    /// Start panning the viewport. Panning never targets a shape.
    pub fn start_panning(&mut self, mouse: Point, camera_offset: Vec2) {
        self.begin(InteractionKind::Panning, None, mouse);
        self.pan_origin = camera_offset;
    }

    /// End the gesture. The targeted shape stays selected.
    pub fn finish(&mut self) {
        let shape = self.shape.take();
        *self = Self {
            shape,
            ..Self::default()
        };
    }

    /// Drop everything, including the selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        self.kind == InteractionKind::Idle
    }

    /// Whether `id` is the targeted shape.
    pub fn targets(&self, id: &str) -> bool {
        self.shape.as_deref() == Some(id)
    }
}
