use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::state::AppState;
use crate::ws::hub::Observer;

/// Sending half of an observer's WebSocket.
pub struct WsObserver {
    sender: SplitSink<WebSocket, Message>,
}

impl WsObserver {
    pub fn new(sender: SplitSink<WebSocket, Message>) -> Self {
        Self { sender }
    }
}

impl Observer for WsObserver {
    async fn deliver(&mut self, message: &str) -> anyhow::Result<()> {
        self.sender.send(Message::Text(message.to_owned().into())).await?;
        Ok(())
    }

    async fn close(mut self) {
        let _ = self.sender.close().await;
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_observer_socket(socket, state))
}

async fn handle_observer_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let id = state.hub.register(WsObserver::new(sender)).await;
    tracing::info!(observer = %id, "Observer connected");

    // Observers never send anything meaningful; drain until the peer goes away.
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Close(_) = msg {
            break;
        }
    }

    if state.hub.unregister(id).await {
        tracing::info!(observer = %id, "Observer disconnected");
    }
}
