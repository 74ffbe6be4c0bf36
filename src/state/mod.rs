mod chat;
mod poll;
mod results;
mod roster;

pub use results::tally;

use crate::protocol::ServerMessage;
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};

/// Capacity of the audience broadcast channels. Slow receivers that fall
/// behind skip messages (RecvError::Lagged).
const BROADCAST_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot create new poll while current poll is active")]
    PollActive,
    #[error("No active poll")]
    NoActivePoll,
    #[error("Student not found")]
    UnknownParticipant,
    #[error("Already answered this poll")]
    AlreadyAnswered,
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::PollActive => "POLL_ACTIVE",
            SessionError::NoActivePoll => "NO_ACTIVE_POLL",
            SessionError::UnknownParticipant => "UNKNOWN_PARTICIPANT",
            SessionError::AlreadyAnswered => "ALREADY_ANSWERED",
        }
    }
}

/// Everything the session invariants range over. Kept behind a single
/// lock so each guard-then-mutate-then-check sequence is indivisible on
/// the multi-threaded runtime.
#[derive(Default)]
pub struct SessionInner {
    pub poll: Option<Poll>,
    pub history: Vec<PollRecord>,
    pub students: HashMap<ConnectionId, Student>,
    /// Per-poll answer record; cleared in full when a new poll starts.
    pub answers: HashMap<ConnectionId, String>,
    pub chat: Vec<ChatMessage>,
}

/// Shared session state
#[derive(Clone)]
pub struct SessionState {
    pub inner: Arc<RwLock<SessionInner>>,
    /// Broadcast channel reaching every connected client
    pub broadcast: broadcast::Sender<ServerMessage>,
    /// Broadcast channel reaching teacher connections only
    pub teacher_broadcast: broadcast::Sender<ServerMessage>,
    /// Per-connection senders for targeted delivery (kick, replay)
    connections: Arc<RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>>>,
}

impl SessionState {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(BROADCAST_CAPACITY);
        let (teacher_tx, _rx) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(SessionInner::default())),
            broadcast: tx,
            teacher_broadcast: teacher_tx,
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Publish to every connected client. Fire-and-forget; no receivers
    /// connected is fine.
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        let _ = self.broadcast.send(msg);
    }

    /// Publish to teacher connections only
    pub fn broadcast_to_teachers(&self, msg: ServerMessage) {
        let _ = self.teacher_broadcast.send(msg);
    }

    /// Register a connection's direct-delivery sender. Called by the
    /// WebSocket layer at upgrade time.
    pub async fn register_connection(
        &self,
        conn_id: ConnectionId,
        tx: mpsc::UnboundedSender<ServerMessage>,
    ) {
        self.connections.write().await.insert(conn_id, tx);
    }

    /// Drop a connection's direct-delivery sender; idempotent
    pub async fn unregister_connection(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Deliver a message to one specific connection. Returns false if the
    /// connection is unknown or already gone.
    pub async fn send_to(&self, conn_id: &str, msg: ServerMessage) -> bool {
        let connections = self.connections.read().await;
        match connections.get(conn_id) {
            Some(tx) => tx.send(msg).is_ok(),
            None => false,
        }
    }

    /// Notify the target connection it was removed, then drop its sender.
    /// The target's event loop drains the queued signal, observes channel
    /// closure, and tears the socket down; roster removal happens through
    /// the ordinary disconnect cleanup.
    pub async fn kick_connection(&self, conn_id: &str) -> bool {
        let mut connections = self.connections.write().await;
        match connections.remove(conn_id) {
            Some(tx) => {
                let _ = tx.send(ServerMessage::Kicked);
                true
            }
            None => false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
