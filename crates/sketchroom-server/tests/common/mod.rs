//! Test server harness for integration tests.
//!
//! Spins up the real router on an ephemeral port and provides a small
//! WebSocket client for driving it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use sketchroom_server::RoomRegistry;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// A running server instance.
pub struct TestServer {
    addr: SocketAddr,
    registry: RoomRegistry,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on a random available port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");
        let registry = RoomRegistry::new();
        let app = sketchroom_server::app(registry.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { addr, registry, handle }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Connect a new client.
    pub async fn client(&self) -> TestClient {
        TestClient::connect(&self.ws_url()).await
    }

    /// Wait until `room` has exactly `count` clients. Joins carry no
    /// acknowledgement, so tests sync on the registry instead.
    pub async fn wait_for_clients(&self, room: &str, count: usize) {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        while self.registry.client_count(room) != count {
            assert!(
                tokio::time::Instant::now() < deadline,
                "room {room} never reached {count} clients"
            );
            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Wait until `room` no longer exists.
    pub async fn wait_for_room_gone(&self, room: &str) {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        while self.registry.contains(room) {
            assert!(tokio::time::Instant::now() < deadline, "room {room} was never deleted");
            sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A raw WebSocket client speaking JSON text frames.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(url: &str) -> Self {
        let (ws, _) = connect_async(url).await.expect("failed to connect");
        Self { ws }
    }

    pub async fn send_text(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.into()))
            .await
            .expect("send failed");
    }

    pub async fn send_json(&mut self, value: &Value) {
        self.send_text(&value.to_string()).await;
    }

    /// Next text frame, or `None` on timeout or close.
    pub async fn recv_text(&mut self) -> Option<String> {
        self.recv_text_within(RECV_TIMEOUT).await
    }

    pub async fn recv_text_within(&mut self, wait: Duration) -> Option<String> {
        loop {
            let msg = timeout(wait, self.ws.next()).await.ok()??.ok()?;
            match msg {
                Message::Text(text) => return Some(text.as_str().to_owned()),
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    pub async fn recv_json(&mut self) -> Option<Value> {
        let text = self.recv_text().await?;
        serde_json::from_str(&text).ok()
    }

    /// Assert nothing arrives within `wait`.
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Some(text) = self.recv_text_within(wait).await {
            panic!("expected no message, got {text}");
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
