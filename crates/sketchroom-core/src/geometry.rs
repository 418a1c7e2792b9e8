//! Geometry kernel: rotation, distances and containment tests.
//!
//! Everything here is a pure function over `kurbo` values. Boundary tests are
//! inclusive so that a click exactly on an edge still selects the shape.

use kurbo::{Point, Rect, Vec2};

/// Hit tolerance for lines and freehand strokes, in world units.
pub const HIT_TOLERANCE: f64 = 8.0;
/// Radius of the circular hit zone around a handle.
pub const HANDLE_TOLERANCE: f64 = 10.0;
/// Smallest width, height or radius a resize may produce.
pub const MIN_SHAPE_SIZE: f64 = 20.0;

/// Rotate `point` about `center` by `angle` radians.
///
/// A zero angle returns `point` unchanged (bit for bit).
pub fn rotate_point(point: Point, center: Point, angle: f64) -> Point {
    if angle == 0.0 {
        return point;
    }
    center + rotate_point_local(point, center, angle)
}

/// Rotate `point` about `center` and return the rotated offset from `center`.
///
/// Used to move a world point into a shape's local, unrotated frame.
pub fn rotate_point_local(point: Point, center: Point, angle: f64) -> Vec2 {
    let d = point - center;
    if angle == 0.0 {
        return d;
    }
    let (sin, cos) = angle.sin_cos();
    Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Rotate a free vector by `angle` radians.
pub fn rotate_vec(v: Vec2, angle: f64) -> Vec2 {
    if angle == 0.0 {
        return v;
    }
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).length()
}

/// Inclusive axis-aligned containment.
pub fn is_point_in_rect(point: Point, rect: Rect) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Inclusive circle containment.
pub fn is_point_in_circle(point: Point, center: Point, radius: f64) -> bool {
    (point - center).length_squared() <= radius * radius
}

/// Distance from a point to the segment `a`→`b`.
pub fn point_to_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.length_squared();
    if len_sq < f64::EPSILON {
        return pv.length();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).length()
}

/// Whether `point` lies within `threshold` of the segment `a`→`b`.
pub fn is_point_near_segment(point: Point, a: Point, b: Point, threshold: f64) -> bool {
    point_to_segment_distance(point, a, b) <= threshold
}

/// Whether `point` falls in the circular hit zone of a handle at `handle`.
pub fn is_near_handle(point: Point, handle: Point) -> bool {
    is_point_in_circle(point, handle, HANDLE_TOLERANCE)
}

/// Axis-aligned bounds of a set of points, `None` when empty.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let init = Rect::new(first.x, first.y, first.x, first.y);
    Some(points.iter().skip(1).fold(init, |r, p| {
        Rect::new(r.x0.min(p.x), r.y0.min(p.y), r.x1.max(p.x), r.y1.max(p.y))
    }))
}
