//! Tools and pointer cursors.

use crate::selection::{Corner, Edge, HandleKind};
use crate::shapes::ShapeKind;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
    Line,
    Pencil,
}

impl ToolKind {
    /// Shape variant this tool draws, `None` for the select tool.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Pencil => Some(ShapeKind::Pencil),
        }
    }

    pub fn is_drawing(self) -> bool {
        self.shape_kind().is_some()
    }
}

/// Pointer cursor the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Move,
    Grabbing,
    Rotate,
    /// Diagonal resize, top-left to bottom-right.
    ResizeNwse,
    /// Diagonal resize, top-right to bottom-left.
    ResizeNesw,
    ResizeNs,
    ResizeEw,
    /// Endpoint or radius drag.
    Pointer,
}

impl Cursor {
    /// Cursor shown while hovering a handle.
    pub fn for_handle(handle: HandleKind) -> Self {
        match handle {
            HandleKind::Corner(Corner::TopLeft | Corner::BottomRight) => Cursor::ResizeNwse,
            HandleKind::Corner(Corner::TopRight | Corner::BottomLeft) => Cursor::ResizeNesw,
            HandleKind::Edge(Edge::Top | Edge::Bottom) => Cursor::ResizeNs,
            HandleKind::Edge(Edge::Left | Edge::Right) => Cursor::ResizeEw,
            HandleKind::Rotate => Cursor::Rotate,
            HandleKind::Radius | HandleKind::Start | HandleKind::End => Cursor::Pointer,
        }
    }

    /// CSS cursor keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Crosshair => "crosshair",
            Cursor::Move => "move",
            Cursor::Grabbing => "grabbing",
            Cursor::Rotate => "alias",
            Cursor::ResizeNwse => "nwse-resize",
            Cursor::ResizeNesw => "nesw-resize",
            Cursor::ResizeNs => "ns-resize",
            Cursor::ResizeEw => "ew-resize",
            Cursor::Pointer => "pointer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_shape_kind() {
        assert_eq!(ToolKind::Select.shape_kind(), None);
        assert_eq!(ToolKind::Pencil.shape_kind(), Some(ShapeKind::Pencil));
        assert!(ToolKind::Circle.is_drawing());
    }

    #[test]
    fn test_tool_serde() {
        let tool: ToolKind = serde_json::from_str("\"rectangle\"").unwrap();
        assert_eq!(tool, ToolKind::Rectangle);
    }

    #[test]
    fn test_handle_cursors() {
        assert_eq!(Cursor::for_handle(HandleKind::Corner(Corner::TopLeft)), Cursor::ResizeNwse);
        assert_eq!(Cursor::for_handle(HandleKind::Edge(Edge::Left)).as_css(), "ew-resize");
        assert_eq!(Cursor::for_handle(HandleKind::Rotate), Cursor::Rotate);
    }
}
