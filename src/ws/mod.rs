pub mod handlers;
pub mod student;
pub mod teacher;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::SessionState;
use crate::types::Role;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SessionState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection. The connection identifier
/// lives exactly as long as the socket; the session state only ever sees
/// it as a key.
async fn handle_socket(socket: WebSocket, state: SessionState) {
    let (mut sender, mut receiver) = socket.split();

    let conn_id = ulid::Ulid::new().to_string();
    tracing::info!("WebSocket connected: {}", conn_id);

    // Targeted delivery queue (kick signal, catch-up replay)
    let (direct_tx, mut direct_rx) = mpsc::unbounded_channel();
    state.register_connection(conn_id.clone(), direct_tx).await;

    // Everyone-channel from the start; the teacher channel is subscribed
    // once the connection announces itself as a teacher
    let mut broadcast_rx = state.broadcast.subscribe();
    let mut teacher_rx: Option<tokio::sync::broadcast::Receiver<ServerMessage>> = None;
    let mut role: Option<Role> = None;

    loop {
        tokio::select! {
            // Targeted messages; channel closure means this connection
            // was kicked and the socket should be torn down
            direct_msg = direct_rx.recv() => {
                match direct_msg {
                    Some(msg) => {
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    None => {
                        tracing::info!("Connection {} kicked, closing socket", conn_id);
                        break;
                    }
                }
            }

            // Broadcasts to everyone
            broadcast_msg = broadcast_rx.recv() => {
                if let Ok(msg) = broadcast_msg {
                    if let Ok(json) = serde_json::to_string(&msg) {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                }
            }

            // Teacher-only broadcasts
            teacher_msg = async {
                match &mut teacher_rx {
                    Some(rx) => rx.recv().await.ok(),
                    None => {
                        // Not a teacher: wait forever
                        std::future::pending::<Option<ServerMessage>>().await
                    }
                }
            } => {
                if let Some(msg) = teacher_msg {
                    if let Ok(json) = serde_json::to_string(&msg) {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                }
            }

            // Inbound client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);

                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                if let Some(response) =
                                    handlers::handle_message(client_msg, &conn_id, &mut role, &state).await
                                {
                                    if let Ok(json) = serde_json::to_string(&response) {
                                        if sender.send(Message::Text(json.into())).await.is_err() {
                                            break;
                                        }
                                    }
                                }

                                // A join as teacher opens the teacher-only feed
                                if role == Some(Role::Teacher) && teacher_rx.is_none() {
                                    teacher_rx = Some(state.teacher_broadcast.subscribe());
                                }
                            }
                            Err(e) => {
                                tracing::error!("Failed to parse client message: {}", e);
                                let error = ServerMessage::Error {
                                    code: "PARSE_ERROR".to_string(),
                                    msg: format!("Invalid message format: {}", e),
                                };
                                if let Ok(json) = serde_json::to_string(&error) {
                                    let _ = sender.send(Message::Text(json.into())).await;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed: {}", conn_id);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    // Disconnect cleanup: drop the delivery sender and, if this was a
    // student, take them off the roster (which notifies teachers). Both
    // steps are idempotent, so a kicked connection is removed exactly once.
    state.unregister_connection(&conn_id).await;
    state.remove_student(&conn_id).await;

    tracing::info!("WebSocket connection closed: {}", conn_id);
}
