//! Collaboration management for room-based editing.
//!
//! Bridges the local [`Editor`] and the room protocol: committed local edits
//! become outbound frames, inbound server frames are applied to the editor.
//! Transport is left to the host (see [`crate::sync`]).

use crate::editor::{Edit, Editor};
use crate::protocol::{ClientMessage, InboundFrame, ProtocolError, ServerMessage};
use crate::shapes::ShapeId;

/// What an inbound server frame did to the local canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    ShapeAdded(ShapeId),
    ShapeUpdated(ShapeId),
    ShapeDeleted(ShapeId),
    Cleared,
    /// Full list received (on join, or a peer's bulk replace).
    Snapshot { room_id: String, count: usize },
    /// The server rejected one of our frames.
    ServerError {
        message: String,
        received_type: Option<String>,
    },
}

/// Tracks the joined room and queues outgoing frames.
#[derive(Debug, Default)]
pub struct CollaborationManager {
    /// Current room ID (if joined).
    current_room: Option<String>,
    /// Pending outgoing messages (JSON strings).
    outgoing: Vec<String>,
}

impl CollaborationManager {
    /// Create a new collaboration manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current room ID.
    pub fn current_room(&self) -> Option<&str> {
        self.current_room.as_deref()
    }

    /// Check if we're in a room.
    pub fn is_in_room(&self) -> bool {
        self.current_room.is_some()
    }

    /// Join a room. The server has no acknowledgement, so the room is current immediately.
    pub fn join_room(&mut self, room: &str) {
        self.queue(&ClientMessage::join_room(room));
        self.current_room = Some(room.to_owned());
    }

    /// Leave the current room, if any.
    pub fn leave_room(&mut self) {
        if self.current_room.take().is_some() {
            self.queue(&ClientMessage::leave_room());
        }
    }

    /// Turn the editor's committed edits into outbound frames.
    ///
    /// Edits made outside a room are drained and dropped. Returns the number
    /// of frames queued.
    pub fn flush_edits(&mut self, editor: &mut Editor) -> usize {
        let edits = editor.take_edits();
        if self.current_room.is_none() {
            if !edits.is_empty() {
                log::debug!("not in a room, dropping {} local edits", edits.len());
            }
            return 0;
        }
        let before = self.outgoing.len();
        for edit in edits {
            let encoded = match edit {
                Edit::Add(shape) => ClientMessage::add_shape(shape).to_json(),
                Edit::Update(shape) => ClientMessage::update_shape(shape).to_json(),
                Edit::Delete(id) => ClientMessage::delete_shape(id).to_json(),
                Edit::Clear => ClientMessage::empty_shapes().to_json(),
                Edit::ReplaceAll(shapes) => InboundFrame::bulk_json(&shapes),
            };
            match encoded {
                Ok(json) => self.outgoing.push(json),
                Err(e) => log::error!("dropping edit: {e}"),
            }
        }
        self.outgoing.len() - before
    }

    /// Take pending outgoing messages (drains the queue).
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }

    /// Check if there are pending outgoing messages.
    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Apply an incoming server frame to the editor.
    pub fn handle_message(&mut self, json: &str, editor: &mut Editor) -> Result<RoomEvent, ProtocolError> {
        let event = match ServerMessage::parse(json)? {
            ServerMessage::AddShape { shape, .. } => {
                let id = shape.id().to_owned();
                editor.apply_remote(Edit::Add(shape));
                RoomEvent::ShapeAdded(id)
            }
            ServerMessage::UpdateShape { shape, .. } => {
                let id = shape.id().to_owned();
                editor.apply_remote(Edit::Update(shape));
                RoomEvent::ShapeUpdated(id)
            }
            ServerMessage::DeleteShape { shape_id, .. } => {
                editor.apply_remote(Edit::Delete(shape_id.clone()));
                RoomEvent::ShapeDeleted(shape_id)
            }
            ServerMessage::EmptyShapes { .. } => {
                editor.apply_remote(Edit::Clear);
                RoomEvent::Cleared
            }
            ServerMessage::Broadcast {
                room_id, count, data, ..
            } => {
                editor.apply_remote(Edit::ReplaceAll(data));
                RoomEvent::Snapshot { room_id, count }
            }
            ServerMessage::Error {
                message,
                received_type,
                details,
                ..
            } => {
                log::warn!("server error: {message} ({})", details.as_deref().unwrap_or("no details"));
                RoomEvent::ServerError {
                    message,
                    received_type,
                }
            }
        };
        Ok(event)
    }

    fn queue(&mut self, msg: &ClientMessage) {
        match msg.to_json() {
            Ok(json) => self.outgoing.push(json),
            Err(e) => log::error!("failed to encode {}: {e}", msg.type_name()),
        }
    }
}
