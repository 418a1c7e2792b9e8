//! Inbound frame dispatch.
//!
//! Every text frame from a connection goes through [`handle_text`], which runs
//! synchronously against the registry so edits to one room never interleave.

use crate::rooms::{ClientTx, ConnId, Room, RoomRegistry};
use sketchroom_core::protocol::{BULK_TYPE, ClientMessage, InboundFrame, ServerMessage};
use sketchroom_core::shapes::Shape;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Per-connection state.
#[derive(Debug)]
pub struct Session {
    pub id: ConnId,
    pub room: Option<String>,
    tx: ClientTx,
}

impl Session {
    pub fn new(tx: ClientTx) -> Self {
        Self {
            id: Uuid::new_v4(),
            room: None,
            tx,
        }
    }

    /// Send a message to this connection only.
    fn reply(&self, msg: &ServerMessage) {
        match msg.to_json() {
            Ok(json) => {
                let _ = self.tx.send(json);
            }
            Err(e) => error!(conn = %self.id, "failed to encode reply: {e}"),
        }
    }
}

/// Handle one inbound text frame.
pub fn handle_text(registry: &RoomRegistry, session: &mut Session, text: &str) {
    let frame = match InboundFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(conn = %session.id, received_type = e.received_type(), "rejected frame: {e}");
            session.reply(&ServerMessage::rejected(&e));
            return;
        }
    };

    match frame {
        InboundFrame::Message(ClientMessage::JoinRoom { room_id, .. }) => join(registry, session, room_id),
        InboundFrame::Message(ClientMessage::LeaveRoom { .. }) => leave(registry, session),
        InboundFrame::Message(msg) => {
            let message_type = msg.type_name();
            let relayed = edit_room(registry, session, message_type, |_, room| {
                match msg {
                    ClientMessage::AddShape { shape, .. } => room.upsert(shape),
                    ClientMessage::UpdateShape { shape, .. } => {
                        if !room.update(shape) {
                            debug!("update for unknown shape ignored");
                        }
                    }
                    ClientMessage::DeleteShape { shape_id, .. } => {
                        room.remove(&shape_id);
                    }
                    ClientMessage::EmptyShapes { .. } => room.clear(),
                    ClientMessage::JoinRoom { .. } | ClientMessage::LeaveRoom { .. } => {}
                }
                Some(text.to_owned())
            });
            if let Some(count) = relayed {
                debug!(conn = %session.id, message_type, relayed = count, "shape edit");
            }
        }
        InboundFrame::Bulk(shapes) => {
            let relayed = edit_room(registry, session, BULK_TYPE, |room_id, room| {
                room.replace_all(shapes);
                bulk_broadcast(room_id, room.shapes())
            });
            if let Some(count) = relayed {
                debug!(conn = %session.id, relayed = count, "bulk replace");
            }
        }
    }
}

/// Leave the current room on disconnect. The room's shapes are untouched.
pub fn disconnect(registry: &RoomRegistry, session: &mut Session) {
    leave(registry, session);
}

fn join(registry: &RoomRegistry, session: &mut Session, room_id: String) {
    // Rejoining the current room must not leave it first: a sole member
    // would delete the room and its shapes.
    if let Some(previous) = session.room.take() {
        if previous != room_id {
            registry.leave(&previous, session.id);
        }
    }
    let shapes = registry.join(&room_id, session.id, session.tx.clone());
    if !shapes.is_empty() {
        session.reply(&ServerMessage::broadcast(room_id.clone(), shapes));
    }
    session.room = Some(room_id);
}

fn leave(registry: &RoomRegistry, session: &mut Session) {
    if let Some(room_id) = session.room.take() {
        registry.leave(&room_id, session.id);
    }
}

/// Apply an edit to the session's room and relay the frame `f` returns to the
/// other members. Returns how many clients it reached, or `None` when the
/// session is not in a room.
fn edit_room(
    registry: &RoomRegistry,
    session: &Session,
    message_type: &str,
    f: impl FnOnce(&str, &mut Room) -> Option<String>,
) -> Option<usize> {
    let sender = session.id;
    let relayed = session.room.as_deref().and_then(|room_id| {
        registry.with_room(room_id, |room| {
            f(room_id, room).map_or(0, |out| room.broadcast(sender, &out))
        })
    });
    if relayed.is_none() {
        warn!(conn = %sender, message_type, "shape edit outside a room");
        session.reply(&ServerMessage::not_in_room(message_type));
    }
    relayed
}

fn bulk_broadcast(room_id: &str, shapes: &[Shape]) -> Option<String> {
    match ServerMessage::broadcast(room_id, shapes.to_vec()).to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            error!(room = %room_id, "failed to encode broadcast: {e}");
            None
        }
    }
}
