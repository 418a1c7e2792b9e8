//! Drawing contract and redraw coalescing.

use crate::collection::CollectionEvent;
use crate::selection::{Handle, HandleKind};
use kurbo::{Affine, BezPath, Point, Size};

/// Target the editor paints into.
///
/// Hosts implement this over whatever 2D backend they have. Paths are in
/// world coordinates; the transform set by [`Surface::set_transform`] maps
/// them to the screen.
pub trait Surface {
    /// Clear the whole viewport.
    fn clear(&mut self, viewport: Size);

    /// Set the world-to-screen transform for subsequent calls.
    fn set_transform(&mut self, transform: Affine);

    /// Stroke a shape path.
    fn stroke_path(&mut self, path: &BezPath, color: &str, width: f64);

    /// Stroke a selection outline (dashed, in most hosts).
    fn stroke_selection(&mut self, path: &BezPath);

    /// Draw a selection handle marker.
    fn fill_handle(&mut self, handle: &Handle);
}

/// A call recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Size),
    Transform(Affine),
    Stroke { path: BezPath, color: String, width: f64 },
    Selection(BezPath),
    Handle(HandleKind, Point),
}

/// Surface that records every call, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of full repaints seen.
    pub fn paints(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear(_)))
            .count()
    }

    /// Commands issued since the most recent clear.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .unwrap_or(0);
        &self.commands[start..]
    }

    /// Shape strokes in the most recent frame.
    pub fn last_strokes(&self) -> Vec<&BezPath> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Stroke { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, viewport: Size) {
        self.commands.push(DrawCommand::Clear(viewport));
    }

    fn set_transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::Transform(transform));
    }

    fn stroke_path(&mut self, path: &BezPath, color: &str, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            color: color.to_owned(),
            width,
        });
    }

    fn stroke_selection(&mut self, path: &BezPath) {
        self.commands.push(DrawCommand::Selection(path.clone()));
    }

    fn fill_handle(&mut self, handle: &Handle) {
        self.commands.push(DrawCommand::Handle(handle.kind, handle.position));
    }
}

/// Coalesces redraw requests into at most one paint per frame.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: bool,
    frames: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a repaint. Returns `true` only when this call scheduled one.
    pub fn request_draw(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// React to a collection change.
    pub fn notify(&mut self, event: &CollectionEvent) -> bool {
        log::trace!("collection changed: {event:?}");
        self.request_draw()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request at frame time.
    pub fn begin_frame(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.frames += 1;
        true
    }

    /// Number of frames actually painted.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
