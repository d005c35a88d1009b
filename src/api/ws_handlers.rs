//! WebSocket handler for real-time change notifications.
//!
//! Connection open registers a subscriber; close or any transport error
//! deregisters it. Events arrive over the subscriber's own delivery queue,
//! so a slow client never holds up `publish` or the other subscribers.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::time::{interval, Duration};
use tracing::{debug, warn};

use super::handlers::CatalogState;

/// WebSocket upgrade handler for `/ws/updates`
pub async fn ws_updates(
    ws: WebSocketUpgrade,
    State(state): State<CatalogState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_ws(socket: WebSocket, state: CatalogState) {
    let (subscriber, mut events) = state.registry.connect();
    debug!(subscriber = %subscriber, "WebSocket subscriber connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Ping interval (30s) to detect dead clients
    let mut ping_interval = interval(Duration::from_secs(30));
    // Skip the first immediate tick
    ping_interval.tick().await;

    loop {
        tokio::select! {
            // Forward change events to the client
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => {
                        match serde_json::to_string(&event) {
                            Ok(json) => {
                                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                    debug!(subscriber = %subscriber, "WebSocket send failed, client disconnected");
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("Failed to serialize ChangeEvent: {}", e);
                            }
                        }
                    }
                    // Sender side dropped: the registry removed us after a
                    // failed delivery.
                    None => {
                        debug!(subscriber = %subscriber, "delivery queue closed");
                        break;
                    }
                }
            }

            // Send periodic pings to detect dead clients
            _ = ping_interval.tick() => {
                if ws_sender.send(Message::Ping(vec![].into())).await.is_err() {
                    debug!(subscriber = %subscriber, "Ping failed, client disconnected");
                    break;
                }
            }

            // Handle incoming messages from the client (Pong, Close)
            msg = ws_receiver.next() => {
                match msg {
                    Some(Ok(Message::Pong(_))) => {
                        // Client is alive
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(subscriber = %subscriber, "WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(subscriber = %subscriber, "WebSocket error: {}", e);
                        break;
                    }
                    _ => {
                        // Ignore text/binary messages from clients
                    }
                }
            }
        }
    }

    state.registry.disconnect(subscriber);
    debug!(subscriber = %subscriber, "WebSocket subscriber deregistered");
}
