//! WebSocket connection handling.

use crate::AppState;
use crate::router::{self, Session};
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use sketchroom_core::protocol::ServerMessage;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection until it closes or errors.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut session = Session::new(tx.clone());
    info!(conn = %session.id, "connection opened");

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        router::handle_text(&state.registry, &mut session, text.as_str());
                    }
                    Some(Ok(Message::Binary(_))) => {
                        warn!(conn = %session.id, "binary frame rejected");
                        if let Ok(json) = ServerMessage::error("Binary frames are not supported").to_json() {
                            let _ = tx.send(json);
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong
                    Some(Err(e)) => {
                        warn!(conn = %session.id, "WebSocket error: {e}");
                        break;
                    }
                }
            }

            Some(out) = rx.recv() => {
                if sender.send(Message::Text(out.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    router::disconnect(&state.registry, &mut session);
    info!(conn = %session.id, "connection closed");
}
