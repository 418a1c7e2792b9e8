//! Viewport camera for panning.

use kurbo::{Affine, Point, Vec2};

/// Camera manages the view transform for the canvas.
///
/// Only translation is supported: one world unit is one screen pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
}

impl Camera {
    /// Create a new camera with no offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// World-to-screen transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        screen_point - self.offset
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        world_point + self.offset
    }
}
