//! Canvas editor: turns pointer events into shape mutations.
//!
//! The editor owns the shape collection, the single [`Interaction`], the
//! viewport camera and the render scheduler. Every mutation schedules a redraw;
//! [`Editor::frame`] paints at most once per scheduled redraw. Gestures that
//! should reach other participants are queued as [`Edit`]s and drained with
//! [`Editor::take_edits`].

use crate::camera::Camera;
use crate::collection::{CollectionEvent, ShapeCollection};
use crate::interaction::{Interaction, InteractionKind};
use crate::render::{RenderScheduler, Surface};
use crate::shapes::{Shape, ShapeId, ShapeStyle};
use crate::tools::{Cursor, ToolKind};
use kurbo::{Affine, Point, Size};
use serde::{Deserialize, Serialize};

/// Initial editor settings supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub tool: ToolKind,
    pub color: String,
    pub stroke_width: f64,
    pub viewport: Size,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let style = ShapeStyle::default();
        Self {
            tool: ToolKind::Select,
            color: style.color,
            stroke_width: style.stroke_width,
            viewport: Size::new(800.0, 600.0),
        }
    }
}

/// A committed change to the shape list.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Add(Shape),
    Update(Shape),
    Delete(ShapeId),
    Clear,
    ReplaceAll(Vec<Shape>),
}

/// Interactive canvas state.
#[derive(Debug)]
pub struct Editor {
    shapes: ShapeCollection,
    interaction: Interaction,
    camera: Camera,
    scheduler: RenderScheduler,
    tool: ToolKind,
    style: ShapeStyle,
    viewport: Size,
    cursor: Cursor,
    /// Local edits not yet handed to the network.
    edits: Vec<Edit>,
    /// Bumped on every change to the shape list, local or remote.
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let mut scheduler = RenderScheduler::new();
        scheduler.request_draw();
        Self {
            shapes: ShapeCollection::new(),
            interaction: Interaction::default(),
            camera: Camera::new(),
            scheduler,
            tool: config.tool,
            style: ShapeStyle::new(config.color, config.stroke_width),
            viewport: config.viewport,
            cursor: idle_cursor(config.tool),
            edits: Vec::new(),
            revision: 0,
        }
    }

    pub fn shapes(&self) -> &ShapeCollection {
        &self.shapes
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Style applied to newly drawn shapes.
    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.interaction.shape.as_deref()
    }

    pub fn selected(&self) -> Option<&Shape> {
        self.selected_id().and_then(|id| self.shapes.get(id))
    }

    pub fn is_draw_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Counter of shape-list changes. Differs whenever the snapshot may have.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Pointer pressed at a screen position.
    pub fn pointer_down(&mut self, screen: Point) {
        // A press without a release (pointer left the window) ends the old gesture.
        if !self.interaction.is_idle() {
            self.commit_gesture();
            self.interaction.finish();
        }
        let world = self.camera.screen_to_world(screen);

        if let Some(kind) = self.tool.shape_kind() {
            let shape = Shape::new(kind, world, self.style.clone());
            shape.start_drawing(&mut self.interaction, world);
            let event = self.shapes.insert(shape);
            self.changed(&event);
            return;
        }

        let selected = self
            .interaction
            .shape
            .clone()
            .and_then(|id| self.shapes.get(&id));
        if let Some(shape) = selected {
            if let Some(handle) = shape.handle_at(world) {
                shape.start_resizing(&mut self.interaction, handle, world);
                self.cursor = Cursor::for_handle(handle);
                self.scheduler.request_draw();
                return;
            }
        }

        if let Some(shape) = self.shapes.topmost_at(world) {
            shape.start_dragging(&mut self.interaction, world);
            self.cursor = Cursor::Grabbing;
            self.scheduler.request_draw();
            return;
        }

        self.interaction.start_panning(screen, self.camera.offset);
        self.cursor = Cursor::Grabbing;
        self.scheduler.request_draw();
    }

    /// Pointer moved to a screen position.
    pub fn pointer_move(&mut self, screen: Point) {
        let world = self.camera.screen_to_world(screen);
        match self.interaction.kind {
            InteractionKind::Idle => self.update_hover(world),
            InteractionKind::Panning => {
                self.camera.offset = self.interaction.pan_origin + (screen - self.interaction.start_point);
                self.scheduler.request_draw();
            }
            InteractionKind::Drawing | InteractionKind::Dragging | InteractionKind::Resizing => {
                self.update_target(world);
            }
        }
    }

    /// Pointer released. Ends the gesture; the target stays selected.
    pub fn pointer_up(&mut self, screen: Point) {
        self.commit_gesture();
        self.interaction.finish();
        self.scheduler.request_draw();
        let world = self.camera.screen_to_world(screen);
        self.update_hover(world);
    }

    /// Switch tools. Any gesture in progress is committed and the selection dropped.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.commit_gesture();
        self.interaction.reset();
        self.tool = tool;
        self.cursor = idle_cursor(tool);
        self.scheduler.request_draw();
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.style.color = color.into();
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        if !width.is_finite() || width <= 0.0 {
            log::warn!("ignoring invalid stroke width {width}");
            return;
        }
        self.style.stroke_width = width;
    }

    /// Host viewport changed size.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width, height);
        self.scheduler.request_draw();
    }

    /// Drop the selection.
    pub fn deselect(&mut self) {
        self.commit_gesture();
        self.interaction.reset();
        self.scheduler.request_draw();
    }

    /// Delete the selected shape, if any.
    pub fn delete_selected(&mut self) -> Option<Shape> {
        let id = self.interaction.shape.clone()?;
        self.interaction.reset();
        let (shape, event) = self.shapes.remove(&id)?;
        self.changed(&event);
        self.edits.push(Edit::Delete(id));
        Some(shape)
    }

    /// Remove every shape.
    pub fn clear_all(&mut self) {
        self.interaction.reset();
        let event = self.shapes.clear();
        self.changed(&event);
        self.edits.push(Edit::Clear);
    }

    /// Replace the whole collection with `shapes` and publish the new list.
    pub fn load_shapes(&mut self, shapes: Vec<Shape>) {
        self.interaction.reset();
        let event = self.shapes.replace_all(shapes.clone());
        self.changed(&event);
        self.edits.push(Edit::ReplaceAll(shapes));
    }

    /// Owned copy of all shapes in paint order.
    pub fn snapshot(&self) -> Vec<Shape> {
        self.shapes.to_vec()
    }

    /// Drain local edits queued since the last call.
    pub fn take_edits(&mut self) -> Vec<Edit> {
        std::mem::take(&mut self.edits)
    }

    /// Apply an edit that arrived from another participant. Nothing is queued.
    pub fn apply_remote(&mut self, edit: Edit) {
        let event = match edit {
            Edit::Add(shape) => Some(self.shapes.insert(shape)),
            Edit::Update(shape) => self.shapes.update(shape),
            Edit::Delete(id) => self.shapes.remove(&id).map(|(_, event)| event),
            Edit::Clear => Some(self.shapes.clear()),
            Edit::ReplaceAll(shapes) => Some(self.shapes.replace_all(shapes)),
        };
        let Some(event) = event else {
            return;
        };
        // A gesture whose target vanished has nothing left to act on.
        if let Some(id) = self.selected_id() {
            if !self.shapes.contains(id) {
                log::debug!("remote edit removed targeted shape {id}");
                self.interaction.reset();
            }
        }
        self.changed(&event);
    }

    /// Ask for a repaint without changing anything.
    pub fn request_draw(&mut self) -> bool {
        self.scheduler.request_draw()
    }

    /// Frame callback. Paints if a redraw is pending; returns whether it did.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> bool {
        if !self.scheduler.begin_frame() {
            return false;
        }
        surface.set_transform(Affine::IDENTITY);
        surface.clear(self.viewport);
        surface.set_transform(self.camera.transform());
        for shape in self.shapes.iter() {
            shape.draw(surface);
        }
        if self.interaction.kind != InteractionKind::Drawing {
            if let Some(shape) = self.selected() {
                shape.draw_selection(surface);
            }
        }
        true
    }

    /// Recompute the targeted shape for the current gesture.
    fn update_target(&mut self, world: Point) {
        let Some(id) = self.interaction.shape.clone() else {
            return;
        };
        let Some(shape) = self.shapes.get(&id) else {
            self.interaction.reset();
            return;
        };
        let next = match self.interaction.kind {
            InteractionKind::Drawing => shape.grown(world, self.interaction.start_point),
            InteractionKind::Dragging => shape.moved(world, &self.interaction),
            InteractionKind::Resizing => shape.resized(world, &self.interaction),
            InteractionKind::Idle | InteractionKind::Panning => return,
        };
        if next == *shape {
            return;
        }
        let event = self.shapes.insert(next);
        self.interaction.changed = true;
        self.changed(&event);
    }

    /// Queue the network edit for the gesture in progress, if it produced one.
    fn commit_gesture(&mut self) {
        let Some(id) = self.interaction.shape.clone() else {
            return;
        };
        let kind = self.interaction.kind;
        let Some(shape) = self.shapes.get(&id) else {
            return;
        };
        match kind {
            InteractionKind::Drawing if !shape.is_visible() => {
                log::debug!("discarding empty stroke {id}");
                if let Some((_, event)) = self.shapes.remove(&id) {
                    self.changed(&event);
                }
                self.interaction.reset();
            }
            InteractionKind::Drawing => self.edits.push(Edit::Add(shape.clone())),
            InteractionKind::Dragging | InteractionKind::Resizing if self.interaction.changed => {
                self.edits.push(Edit::Update(shape.clone()));
            }
            _ => {}
        }
    }

    fn changed(&mut self, event: &CollectionEvent) {
        self.revision += 1;
        self.scheduler.notify(event);
    }

    fn update_hover(&mut self, world: Point) {
        let cursor = if self.tool.is_drawing() {
            Cursor::Crosshair
        } else if let Some(handle) = self.selected().and_then(|s| s.handle_at(world)) {
            Cursor::for_handle(handle)
        } else if self.shapes.topmost_at(world).is_some() {
            Cursor::Move
        } else {
            Cursor::Default
        };
        self.cursor = cursor;
    }
}

fn idle_cursor(tool: ToolKind) -> Cursor {
    if tool.is_drawing() {
        Cursor::Crosshair
    } else {
        Cursor::Default
    }
}
