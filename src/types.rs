use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque ID types for type safety
pub type PollId = String;
pub type MessageId = String;
/// Transport-layer connection identifier; owned by the WebSocket layer,
/// the session state only stores it as a key.
pub type ConnectionId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

/// The at-most-one poll the session is tracking. Stays in the slot after
/// closing (with `is_active = false`) until the next create replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub question: String,
    pub options: Vec<String>,
    /// Advisory time limit in seconds; enforced by the deadline watcher,
    /// not by the session state itself.
    pub time_limit: u32,
    pub created_at: String,
    pub is_active: bool,
}

pub const DEFAULT_TIME_LIMIT_SECS: u32 = 60;

/// A closed poll together with its final tally, appended to the
/// immutable poll history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollRecord {
    #[serde(flatten)]
    pub poll: Poll,
    pub results: HashMap<String, u32>,
    pub completed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: ConnectionId,
    pub name: String,
    pub has_answered: bool,
    pub answer: Option<String>,
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender_name: String,
    pub sender_role: Role,
    pub text: String,
    pub timestamp: String,
}
