//! Selection handles and their hit zones.

use crate::geometry::is_near_handle;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Distance from a rectangle's top edge to its rotation handle (in world units).
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle for rectangles and freehand bounds.
    Corner(Corner),
    /// Edge midpoint handle for rectangles and freehand bounds.
    Edge(Edge),
    /// Rotation handle (positioned above the top edge).
    Rotate,
    /// Circle radius handle.
    Radius,
    /// Line start point.
    Start,
    /// Line end point.
    End,
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Which sides of a box a handle drags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sides {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl HandleKind {
    /// The box sides this handle moves during a resize.
    pub fn sides(self) -> Sides {
        let mut s = Sides::default();
        match self {
            HandleKind::Corner(Corner::TopLeft) => {
                s.left = true;
                s.top = true;
            }
            HandleKind::Corner(Corner::TopRight) => {
                s.right = true;
                s.top = true;
            }
            HandleKind::Corner(Corner::BottomLeft) => {
                s.left = true;
                s.bottom = true;
            }
            HandleKind::Corner(Corner::BottomRight) => {
                s.right = true;
                s.bottom = true;
            }
            HandleKind::Edge(Edge::Top) => s.top = true,
            HandleKind::Edge(Edge::Right) => s.right = true,
            HandleKind::Edge(Edge::Bottom) => s.bottom = true,
            HandleKind::Edge(Edge::Left) => s.left = true,
            HandleKind::Rotate | HandleKind::Radius | HandleKind::Start | HandleKind::End => {}
        }
        s
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in the same frame as `position`) hits this handle.
    pub fn hit_test(&self, point: Point) -> bool {
        is_near_handle(point, self.position)
    }
}

/// Corner and edge-midpoint handles of a box, corners first.
pub fn box_handles(bounds: Rect) -> Vec<Handle> {
    let c = bounds.center();
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
        Handle::new(Point::new(c.x, bounds.y0), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(bounds.x1, c.y), HandleKind::Edge(Edge::Right)),
        Handle::new(Point::new(c.x, bounds.y1), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x0, c.y), HandleKind::Edge(Edge::Left)),
    ]
}

/// First handle whose hit zone contains `point`.
pub fn hit_test_handles(handles: &[Handle], point: Point) -> Option<HandleKind> {
    handles.iter().find(|h| h.hit_test(point)).map(|h| h.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_handles() {
        let handles = box_handles(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(handles.len(), 8);
        assert_eq!(handles[0].kind, HandleKind::Corner(Corner::TopLeft));
        assert_eq!(handles[5].position, Point::new(100.0, 25.0));
    }

    #[test]
    fn test_handle_hit_test() {
        let handle = Handle::new(Point::new(50.0, 50.0), HandleKind::Start);
        assert!(handle.hit_test(Point::new(50.0, 50.0)));
        assert!(handle.hit_test(Point::new(55.0, 55.0)));
        assert!(!handle.hit_test(Point::new(70.0, 70.0)));
    }

    #[test]
    fn test_first_match_wins() {
        // Degenerate box: every handle sits on the same spot.
        let handles = box_handles(Rect::new(5.0, 5.0, 5.0, 5.0));
        assert_eq!(
            hit_test_handles(&handles, Point::new(5.0, 5.0)),
            Some(HandleKind::Corner(Corner::TopLeft))
        );
    }

    #[test]
    fn test_sides() {
        let s = HandleKind::Corner(Corner::BottomLeft).sides();
        assert!(s.left && s.bottom && !s.right && !s.top);
        assert_eq!(HandleKind::Rotate.sides(), Sides::default());
    }
}
