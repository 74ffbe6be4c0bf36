use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Register the connection as a teacher observer
    JoinTeacher,
    /// Put the connection on the student roster
    JoinStudent {
        name: String,
    },
    // Teacher-only commands (authorization checked at dispatch)
    CreatePoll {
        question: String,
        options: Vec<String>,
        #[serde(default = "default_time_limit")]
        time_limit_seconds: u32,
    },
    EndPoll,
    KickStudent {
        student_id: ConnectionId,
    },
    SubmitAnswer {
        option: String,
    },
    GetPollHistory,
    SendMessage {
        sender_name: String,
        sender_role: Role,
        text: String,
    },
}

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Replay of the current poll slot (null when no poll has run yet)
    CurrentPoll {
        poll: Option<Poll>,
    },
    /// A new poll was created, sent to everyone
    NewPoll {
        poll: Poll,
    },
    /// Fresh tally snapshot, sent to everyone
    PollResults {
        results: HashMap<String, u32>,
    },
    /// Roster snapshot, teachers only
    StudentsList {
        students: Vec<Student>,
    },
    ChatHistory {
        messages: Vec<ChatMessage>,
    },
    NewMessage {
        message: ChatMessage,
    },
    /// Completion signal; followed by a final PollResults
    PollCompleted,
    /// Reply to GetPollHistory, caller only
    PollHistory {
        polls: Vec<PollRecord>,
    },
    /// Targeted at a removed connection just before it is severed
    Kicked,
    Error {
        code: String,
        msg: String,
    },
}
