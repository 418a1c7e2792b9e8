//! Room wire protocol.
//!
//! Frames are JSON text. Objects carry a snake_case `type` discriminator and a
//! millisecond `timestamp`; a bare array of shapes is a bulk replacement of
//! the room's list.

use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Pseudo type reported for array frames.
pub const BULK_TYPE: &str = "bulk";

/// Protocol errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("Message has no type")]
    MissingType,
    /// `type` present but not a string; holds its JSON text.
    #[error("Message type must be a string, got {0}")]
    InvalidType(String),
    #[error("Unknown message type: {0}")]
    UnknownType(String),
    #[error("Invalid {message_type} payload: {source}")]
    InvalidPayload {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProtocolError {
    /// The `type` the peer sent, when one was readable.
    pub fn received_type(&self) -> Option<&str> {
        match self {
            ProtocolError::UnknownType(t) | ProtocolError::InvalidType(t) => Some(t),
            ProtocolError::InvalidPayload { message_type, .. } => Some(message_type),
            _ => None,
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Messages sent from clients to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join a room, leaving any previous one.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    /// Leave the current room.
    LeaveRoom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    AddShape {
        shape: Shape,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    UpdateShape {
        shape: Shape,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    #[serde(rename_all = "camelCase")]
    DeleteShape {
        shape_id: ShapeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    EmptyShapes {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
}

impl ClientMessage {
    pub const TYPES: [&'static str; 6] = [
        "join_room",
        "leave_room",
        "add_shape",
        "update_shape",
        "delete_shape",
        "empty_shapes",
    ];

    pub fn join_room(room_id: impl Into<String>) -> Self {
        ClientMessage::JoinRoom {
            room_id: room_id.into(),
            timestamp: Some(current_timestamp()),
        }
    }

    pub fn leave_room() -> Self {
        ClientMessage::LeaveRoom {
            timestamp: Some(current_timestamp()),
        }
    }

    pub fn add_shape(shape: Shape) -> Self {
        ClientMessage::AddShape {
            shape,
            timestamp: Some(current_timestamp()),
        }
    }

    pub fn update_shape(shape: Shape) -> Self {
        ClientMessage::UpdateShape {
            shape,
            timestamp: Some(current_timestamp()),
        }
    }

    pub fn delete_shape(shape_id: impl Into<ShapeId>) -> Self {
        ClientMessage::DeleteShape {
            shape_id: shape_id.into(),
            timestamp: Some(current_timestamp()),
        }
    }

    pub fn empty_shapes() -> Self {
        ClientMessage::EmptyShapes {
            timestamp: Some(current_timestamp()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ClientMessage::JoinRoom { .. } => "join_room",
            ClientMessage::LeaveRoom { .. } => "leave_room",
            ClientMessage::AddShape { .. } => "add_shape",
            ClientMessage::UpdateShape { .. } => "update_shape",
            ClientMessage::DeleteShape { .. } => "delete_shape",
            ClientMessage::EmptyShapes { .. } => "empty_shapes",
        }
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

/// One inbound frame as seen by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    Message(ClientMessage),
    /// Replace the whole room list.
    Bulk(Vec<Shape>),
}

impl InboundFrame {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
        if value.is_array() {
            return serde_json::from_value(value)
                .map(InboundFrame::Bulk)
                .map_err(|source| ProtocolError::InvalidPayload {
                    message_type: BULK_TYPE.to_owned(),
                    source,
                });
        }
        let message_type = type_of(&value)?;
        if !ClientMessage::TYPES.contains(&message_type.as_str()) {
            return Err(ProtocolError::UnknownType(message_type));
        }
        serde_json::from_value(value)
            .map(InboundFrame::Message)
            .map_err(|source| ProtocolError::InvalidPayload {
                message_type,
                source,
            })
    }

    /// Encode a bulk replacement frame.
    pub fn bulk_json(shapes: &[Shape]) -> Result<String, ProtocolError> {
        serde_json::to_string(shapes).map_err(ProtocolError::Encode)
    }
}

fn type_of(value: &Value) -> Result<String, ProtocolError> {
    match value.get("type") {
        None | Some(Value::Null) => Err(ProtocolError::MissingType),
        Some(Value::String(t)) => Ok(t.clone()),
        Some(other) => Err(ProtocolError::InvalidType(other.to_string())),
    }
}

/// Messages sent from the server to clients.
///
/// Shape edits are relayed as the sender wrote them, so their timestamp is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    AddShape {
        shape: Shape,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    UpdateShape {
        shape: Shape,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    #[serde(rename_all = "camelCase")]
    DeleteShape {
        shape_id: ShapeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    EmptyShapes {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },
    /// Full shape list for a room.
    #[serde(rename_all = "camelCase")]
    Broadcast {
        room_id: String,
        count: usize,
        data: Vec<Shape>,
        timestamp: u64,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        message: String,
        timestamp: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        received_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl ServerMessage {
    const TYPES: [&'static str; 6] = [
        "add_shape",
        "update_shape",
        "delete_shape",
        "empty_shapes",
        "broadcast",
        "error",
    ];

    pub fn broadcast(room_id: impl Into<String>, data: Vec<Shape>) -> Self {
        ServerMessage::Broadcast {
            room_id: room_id.into(),
            count: data.len(),
            data,
            timestamp: current_timestamp(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
            timestamp: current_timestamp(),
            received_type: None,
            details: None,
        }
    }

    /// Error reply describing why a frame was rejected.
    pub fn rejected(err: &ProtocolError) -> Self {
        let message = match err {
            ProtocolError::Malformed(_) => "Invalid message format",
            ProtocolError::MissingType => "Message type is required",
            ProtocolError::InvalidType(_) => "Message type must be a string",
            ProtocolError::UnknownType(_) => "Unknown message type",
            ProtocolError::InvalidPayload { .. } => "Invalid message payload",
            ProtocolError::Encode(_) => "Internal error",
        };
        ServerMessage::Error {
            message: message.to_owned(),
            timestamp: current_timestamp(),
            received_type: err.received_type().map(str::to_owned),
            details: Some(err.to_string()),
        }
    }

    /// Error reply for a shape edit sent before joining a room.
    pub fn not_in_room(message_type: &str) -> Self {
        ServerMessage::Error {
            message: "Join a room before editing shapes".to_owned(),
            timestamp: current_timestamp(),
            received_type: Some(message_type.to_owned()),
            details: None,
        }
    }

    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
        let message_type = type_of(&value)?;
        if !Self::TYPES.contains(&message_type.as_str()) {
            return Err(ProtocolError::UnknownType(message_type));
        }
        serde_json::from_value(value).map_err(|source| ProtocolError::InvalidPayload {
            message_type,
            source,
        })
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}
