//! Insertion-ordered shape collection.

use crate::shapes::{Shape, ShapeId};
use kurbo::Point;
use std::collections::HashMap;

/// A change applied to a [`ShapeCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEvent {
    Added(ShapeId),
    Updated(ShapeId),
    Removed(ShapeId),
    Cleared,
    Replaced { count: usize },
}

/// Shapes keyed by id, painted in insertion order (later on top).
#[derive(Debug, Clone, Default)]
pub struct ShapeCollection {
    shapes: HashMap<ShapeId, Shape>,
    /// Paint order (back to front).
    order: Vec<ShapeId>,
}

impl ShapeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shape on top, or replace it in place if the id already exists.
    pub fn insert(&mut self, shape: Shape) -> CollectionEvent {
        let id = shape.id().to_owned();
        if self.shapes.insert(id.clone(), shape).is_some() {
            CollectionEvent::Updated(id)
        } else {
            self.order.push(id.clone());
            CollectionEvent::Added(id)
        }
    }

    /// Replace an existing shape. Unknown ids are ignored.
    pub fn update(&mut self, shape: Shape) -> Option<CollectionEvent> {
        let slot = self.shapes.get_mut(shape.id())?;
        let id = shape.id().to_owned();
        *slot = shape;
        Some(CollectionEvent::Updated(id))
    }

    /// Remove a shape by id.
    pub fn remove(&mut self, id: &str) -> Option<(Shape, CollectionEvent)> {
        let shape = self.shapes.remove(id)?;
        self.order.retain(|shape_id| shape_id != id);
        Some((shape, CollectionEvent::Removed(id.to_owned())))
    }

    pub fn clear(&mut self) -> CollectionEvent {
        self.shapes.clear();
        self.order.clear();
        CollectionEvent::Cleared
    }

    /// Swap in a whole new list. A repeated id keeps its first position and its last value.
    pub fn replace_all(&mut self, shapes: impl IntoIterator<Item = Shape>) -> CollectionEvent {
        self.shapes.clear();
        self.order.clear();
        for shape in shapes {
            self.insert(shape);
        }
        CollectionEvent::Replaced { count: self.len() }
    }

    pub fn get(&self, id: &str) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shapes.contains_key(id)
    }

    /// Shapes in paint order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Topmost shape containing a world point.
    pub fn topmost_at(&self, point: Point) -> Option<&Shape> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.shapes.get(id))
            .find(|s| s.contains(point))
    }

    /// Owned copy in paint order, for snapshots and bulk payloads.
    pub fn to_vec(&self) -> Vec<Shape> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
