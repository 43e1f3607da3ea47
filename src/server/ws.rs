//! HTTP routes and the WebSocket connection loop.

use alloc::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use tracing::warn;

use super::{ClientMessage, Gateway};

/// Builds the router: `GET /api/socket` (WebSocket) and `GET /healthz`.
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/api/socket", get(ws_handler))
        .route("/healthz", get(healthz))
        .with_state(gateway)
}

async fn ws_handler(ws: WebSocketUpgrade, State(gateway): State<Arc<Gateway>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, gateway))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn handle_socket(socket: WebSocket, gateway: Arc<Gateway>) {
    let (mut sender, mut receiver) = socket.split();
    let (id, mut rx) = gateway.connect();

    let write_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let payload = match serde_json::to_string(&message) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(?err, "failed to encode outbound message");
                    continue;
                }
            };
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(inbound) => gateway.handle(id, inbound),
                Err(err) => warn!(connection = %id, ?err, "invalid inbound message"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    gateway.disconnect(id);
    write_task.abort();
}
