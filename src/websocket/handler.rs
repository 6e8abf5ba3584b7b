use crate::{
    error::CommandError,
    websocket::{
        actor::SessionActor,
        messages::{ClientMessage, ServerMessage},
    },
    AppState, SessionInfo,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// WebSocket upgrade handler. Every connection plays its own game.
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);
    let (command_tx, command_rx) = mpsc::channel::<ClientMessage>(32);

    tracing::info!("WebSocket connection established for session {}", session_id);
    state.active_sessions.insert(session_id, SessionInfo::new());

    let (actor, sounds) = SessionActor::new(
        session_id,
        &state.config.game,
        state.dictionary.clone(),
        state.high_scores.clone(),
        tx.clone(),
    );
    let mut actor_task = tokio::spawn(actor.run(command_rx, sounds));

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Parse incoming messages and hand them to the session actor
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if command_tx.send(client_msg).await.is_err() {
                            tracing::error!(
                                "Session {}: {}",
                                session_id,
                                CommandError::SessionClosed
                            );
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client disconnected from session {}", session_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for any task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            actor_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
            actor_task.abort();
        }
        _ = (&mut actor_task) => {
            recv_task.abort();
            send_task.abort();
        }
    }

    if let Some((_, info)) = state.active_sessions.remove(&session_id) {
        tracing::info!(
            "WebSocket connection closed for session {} after {:?}",
            session_id,
            info.connected_at.elapsed()
        );
    }
}
