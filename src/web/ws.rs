use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;

use crate::broadcast::SnapshotPayload;

use super::server::AppState;

/// Envelope for messages pushed down the stream socket.
#[derive(Serialize)]
struct StreamMessage<'a> {
    r#type: &'static str,
    data: &'a SnapshotPayload,
}

pub async fn stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One live client: subscribed to the hub for its lifetime, fed a snapshot
/// per broadcast tick. Any send failure or client close tears down just
/// this subscription.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (id, mut rx) = state.hub.subscribe();
    log::info!("ws client connected ({} total)", state.hub.count());

    let (mut sender, mut receiver) = socket.split();
    loop {
        tokio::select! {
            payload = rx.recv() => {
                let Some(payload) = payload else { break };
                let msg = StreamMessage { r#type: "snapshot", data: &payload };
                let text = match serde_json::to_string(&msg) {
                    Ok(text) => text,
                    Err(e) => {
                        log::error!("snapshot serialization failed: {e}");
                        continue;
                    }
                };
                if sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    // Clients don't speak; anything but a close/error is ignored.
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.hub.unsubscribe(id);
    log::info!("ws client disconnected ({} total)", state.hub.count());
}
