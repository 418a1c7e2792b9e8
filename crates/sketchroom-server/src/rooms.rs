//! Room registry.
//!
//! A room maps connection ids to their outbound channels and holds the
//! authoritative shape list. Rooms are created on first join and removed when
//! the last client leaves, so re-joining an abandoned room starts empty.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sketchroom_core::shapes::Shape;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Connection identifier.
pub type ConnId = Uuid;

/// Outbound text frames for one connection.
pub type ClientTx = mpsc::UnboundedSender<String>;

/// Room state.
#[derive(Debug, Default)]
pub struct Room {
    clients: HashMap<ConnId, ClientTx>,
    shapes: Vec<Shape>,
}

impl Room {
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Append a shape, or replace the one with the same id in place.
    pub fn upsert(&mut self, shape: Shape) {
        match self.shapes.iter_mut().find(|s| s.id() == shape.id()) {
            Some(slot) => *slot = shape,
            None => self.shapes.push(shape),
        }
    }

    /// Replace a shape by id. Unknown ids are ignored.
    pub fn update(&mut self, shape: Shape) -> bool {
        match self.shapes.iter_mut().find(|s| s.id() == shape.id()) {
            Some(slot) => {
                *slot = shape;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id() != id);
        self.shapes.len() != before
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Replace the whole list. A repeated id keeps its first position and last value.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes.clear();
        for shape in shapes {
            self.upsert(shape);
        }
    }

    /// Send `text` to every client except `from`. Returns how many sends succeeded.
    ///
    /// Closed channels are skipped; their connection task removes them on exit.
    pub fn broadcast(&self, from: ConnId, text: &str) -> usize {
        let mut sent = 0;
        for (id, tx) in &self.clients {
            if *id != from && tx.send(text.to_owned()).is_ok() {
                sent += 1;
            }
        }
        sent
    }
}

/// Shared map of room id to [`Room`].
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<String, Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client to a room, creating it if needed. Returns the room's current shapes.
    pub fn join(&self, room_id: &str, conn: ConnId, tx: ClientTx) -> Vec<Shape> {
        let mut room = match self.rooms.entry(room_id.to_owned()) {
            Entry::Occupied(entry) => entry.into_ref(),
            Entry::Vacant(entry) => {
                info!(room = %room_id, "room created");
                entry.insert(Room::default())
            }
        };
        room.clients.insert(conn, tx);
        debug!(room = %room_id, %conn, clients = room.clients.len(), "client joined");
        room.shapes.clone()
    }

    /// Remove a client from a room, deleting the room once it is empty.
    pub fn leave(&self, room_id: &str, conn: ConnId) {
        let empty = match self.rooms.get_mut(room_id) {
            Some(mut room) => {
                room.clients.remove(&conn);
                debug!(room = %room_id, %conn, clients = room.clients.len(), "client left");
                room.clients.is_empty()
            }
            None => return,
        };
        if empty && self.rooms.remove_if(room_id, |_, room| room.clients.is_empty()).is_some() {
            info!(room = %room_id, "room deleted");
        }
    }

    /// Run `f` against a room while holding its entry.
    pub fn with_room<R>(&self, room_id: &str, f: impl FnOnce(&mut Room) -> R) -> Option<R> {
        self.rooms.get_mut(room_id).map(|mut room| f(&mut room))
    }

    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn client_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, |room| room.client_count())
    }

    pub fn shapes(&self, room_id: &str) -> Option<Vec<Shape>> {
        self.rooms.get(room_id).map(|room| room.shapes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use sketchroom_core::shapes::{Circle, Rectangle};

    fn rect(id: &str, w: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::ZERO, w, 10.0).with_id(id))
    }

    fn client() -> (ConnId, ClientTx, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Uuid::new_v4(), tx, rx)
    }

    #[test]
    fn test_join_creates_and_last_leave_deletes() {
        let registry = RoomRegistry::new();
        let (a, tx_a, _rx_a) = client();
        let (b, tx_b, _rx_b) = client();

        assert!(registry.join("r", a, tx_a).is_empty());
        registry.join("r", b, tx_b);
        assert_eq!(registry.client_count("r"), 2);

        registry.leave("r", a);
        assert!(registry.contains("r"));
        registry.leave("r", b);
        assert!(!registry.contains("r"));
        assert_eq!(registry.room_count(), 0);

        // Leaving twice or leaving an unknown room is harmless.
        registry.leave("r", b);
    }

    #[test]
    fn test_rejoin_yields_fresh_room() {
        let registry = RoomRegistry::new();
        let (a, tx_a, _rx) = client();
        registry.join("r", a, tx_a.clone());
        registry.with_room("r", |room| room.upsert(rect("x", 10.0)));
        registry.leave("r", a);

        assert!(registry.join("r", a, tx_a).is_empty());
    }

    #[test]
    fn test_join_returns_current_shapes() {
        let registry = RoomRegistry::new();
        let (a, tx_a, _rx_a) = client();
        let (b, tx_b, _rx_b) = client();
        registry.join("r", a, tx_a);
        registry.with_room("r", |room| room.upsert(rect("x", 10.0)));
        assert_eq!(registry.join("r", b, tx_b), vec![rect("x", 10.0)]);
    }

    #[test]
    fn test_broadcast_excludes_sender() {
        let registry = RoomRegistry::new();
        let (a, tx_a, mut rx_a) = client();
        let (b, tx_b, mut rx_b) = client();
        let (c, tx_c, mut rx_c) = client();
        registry.join("r", a, tx_a);
        registry.join("r", b, tx_b);
        registry.join("other", c, tx_c);

        let sent = registry.with_room("r", |room| room.broadcast(a, "hello")).unwrap();
        assert_eq!(sent, 1);
        assert_eq!(rx_b.try_recv().unwrap(), "hello");
        assert!(rx_a.try_recv().is_err());
        assert!(rx_c.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_skips_closed_channels() {
        let registry = RoomRegistry::new();
        let (a, tx_a, _rx_a) = client();
        let (b, tx_b, rx_b) = client();
        let (c, tx_c, mut rx_c) = client();
        registry.join("r", a, tx_a);
        registry.join("r", b, tx_b);
        registry.join("r", c, tx_c);
        drop(rx_b);

        let sent = registry.with_room("r", |room| room.broadcast(a, "x")).unwrap();
        assert_eq!(sent, 1);
        assert_eq!(rx_c.try_recv().unwrap(), "x");
    }

    #[test]
    fn test_shape_list_operations() {
        let mut room = Room::default();
        room.upsert(rect("a", 10.0));
        room.upsert(Shape::Circle(Circle::new(Point::ZERO, 5.0).with_id("b")));
        room.upsert(rect("a", 99.0));
        assert_eq!(room.shapes().len(), 2);
        assert_eq!(room.shapes()[0], rect("a", 99.0));

        assert!(!room.update(rect("missing", 1.0)));
        assert_eq!(room.shapes().len(), 2);
        assert!(room.update(rect("a", 5.0)));

        assert!(room.remove("b"));
        assert!(!room.remove("b"));
        room.clear();
        assert!(room.shapes().is_empty());

        room.replace_all(vec![rect("a", 1.0), rect("b", 2.0), rect("a", 3.0)]);
        assert_eq!(room.shapes(), &[rect("a", 3.0), rect("b", 2.0)]);
    }
}
