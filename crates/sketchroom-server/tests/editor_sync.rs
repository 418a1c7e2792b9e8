//! Editors on both ends of a room, connected through the real server.

mod common;

use common::{TestClient, TestServer};
use kurbo::Point;
use sketchroom_core::storage::{AutoSaveManager, MemoryStorage};
use sketchroom_core::{CollaborationManager, Editor, RoomEvent, Shape, ToolKind};
use std::sync::Arc;
use std::time::Duration;

struct Peer {
    editor: Editor,
    collab: CollaborationManager,
    client: TestClient,
}

impl Peer {
    async fn join(server: &TestServer, room: &str) -> Self {
        let mut peer = Self {
            editor: Editor::default(),
            collab: CollaborationManager::new(),
            client: server.client().await,
        };
        peer.collab.join_room(room);
        peer.flush().await;
        peer
    }

    /// Send every committed local edit.
    async fn flush(&mut self) {
        self.collab.flush_edits(&mut self.editor);
        for frame in self.collab.take_outgoing() {
            self.client.send_text(&frame).await;
        }
    }

    /// Apply the next inbound frame.
    async fn pump(&mut self) -> RoomEvent {
        let text = self.client.recv_text().await.expect("no frame from server");
        self.collab
            .handle_message(&text, &mut self.editor)
            .expect("frame should apply")
    }

    fn drag(&mut self, tool: ToolKind, from: Point, to: Point) {
        self.editor.set_tool(tool);
        self.editor.pointer_down(from);
        self.editor.pointer_move(to);
        self.editor.pointer_up(to);
    }

    fn only_rect(&self) -> (f64, f64, f64, f64) {
        let shapes = self.editor.snapshot();
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Rectangle(r) => (r.x, r.y, r.width, r.height),
            other => panic!("expected a rectangle, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn two_clients_sync_a_rectangle() {
    let server = TestServer::start().await;
    let mut a = Peer::join(&server, "sketch").await;
    let mut b = Peer::join(&server, "sketch").await;
    server.wait_for_clients("sketch", 2).await;

    a.drag(ToolKind::Rectangle, Point::new(10.0, 10.0), Point::new(60.0, 40.0));
    a.flush().await;

    let id = a.editor.snapshot()[0].id().to_owned();
    assert_eq!(b.pump().await, RoomEvent::ShapeAdded(id.clone()));
    assert_eq!(b.only_rect(), (10.0, 10.0, 50.0, 30.0));
    assert_eq!(b.editor.snapshot(), a.editor.snapshot());

    // Move it; one update for the whole gesture.
    a.editor.set_tool(ToolKind::Select);
    a.editor.pointer_down(Point::new(25.0, 25.0));
    for step in 1..=10 {
        a.editor.pointer_move(Point::new(25.0 + step as f64, 25.0 + step as f64));
    }
    a.editor.pointer_up(Point::new(35.0, 35.0));
    a.flush().await;

    assert_eq!(b.pump().await, RoomEvent::ShapeUpdated(id));
    assert_eq!(b.only_rect(), (20.0, 20.0, 50.0, 30.0));
    b.client.expect_silence(Duration::from_millis(200)).await;
    assert_eq!(server.registry().shapes("sketch").unwrap(), a.editor.snapshot());
}

#[tokio::test]
async fn empty_shapes_clears_peers_and_late_joiner_gets_nothing() {
    let server = TestServer::start().await;
    let mut a = Peer::join(&server, "wipe").await;
    let mut b = Peer::join(&server, "wipe").await;
    server.wait_for_clients("wipe", 2).await;

    a.drag(ToolKind::Circle, Point::new(100.0, 100.0), Point::new(130.0, 100.0));
    a.flush().await;
    b.pump().await;
    assert_eq!(b.editor.shapes().len(), 1);

    a.editor.clear_all();
    a.flush().await;
    assert_eq!(b.pump().await, RoomEvent::Cleared);
    assert!(b.editor.shapes().is_empty());

    let mut c = Peer::join(&server, "wipe").await;
    server.wait_for_clients("wipe", 3).await;
    c.client.expect_silence(Duration::from_millis(300)).await;
    assert!(c.editor.shapes().is_empty());
}

#[tokio::test]
async fn reversed_drag_is_normalized_for_peers() {
    let server = TestServer::start().await;
    let mut a = Peer::join(&server, "norm").await;
    let mut b = Peer::join(&server, "norm").await;
    server.wait_for_clients("norm", 2).await;

    a.drag(ToolKind::Rectangle, Point::new(100.0, 100.0), Point::new(50.0, 50.0));
    a.flush().await;
    b.pump().await;
    assert_eq!(b.only_rect(), (50.0, 50.0, 50.0, 50.0));
}

#[tokio::test]
async fn delete_selected_reaches_peers() {
    let server = TestServer::start().await;
    let mut a = Peer::join(&server, "del").await;
    let mut b = Peer::join(&server, "del").await;
    server.wait_for_clients("del", 2).await;

    a.drag(ToolKind::Line, Point::new(0.0, 0.0), Point::new(80.0, 80.0));
    a.flush().await;
    b.pump().await;

    a.editor.set_tool(ToolKind::Select);
    a.editor.pointer_down(Point::new(40.0, 40.0));
    a.editor.pointer_up(Point::new(40.0, 40.0));
    let removed = a.editor.delete_selected().expect("line should be selected");
    a.flush().await;

    assert_eq!(b.pump().await, RoomEvent::ShapeDeleted(removed.id().to_owned()));
    assert!(b.editor.shapes().is_empty());
}

#[tokio::test]
async fn restored_snapshot_is_published_to_room() {
    let server = TestServer::start().await;
    let storage = Arc::new(MemoryStorage::new());

    // A previous session left a drawing behind.
    let mut offline = Editor::default();
    offline.set_tool(ToolKind::Pencil);
    offline.pointer_down(Point::new(0.0, 0.0));
    offline.pointer_move(Point::new(5.0, 5.0));
    offline.pointer_move(Point::new(10.0, 0.0));
    offline.pointer_up(Point::new(10.0, 0.0));
    let mut autosave = AutoSaveManager::new(storage);
    autosave.save(&offline).unwrap();

    let mut a = Peer::join(&server, "restore").await;
    let mut b = Peer::join(&server, "restore").await;
    server.wait_for_clients("restore", 2).await;

    assert!(autosave.restore(&mut a.editor));
    a.flush().await;

    assert_eq!(
        b.pump().await,
        RoomEvent::Snapshot {
            room_id: "restore".to_owned(),
            count: 1
        }
    );
    assert_eq!(b.editor.snapshot(), offline.snapshot());
}
