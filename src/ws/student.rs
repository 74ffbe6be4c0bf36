//! Student message handlers

use crate::protocol::ServerMessage;
use crate::state::SessionState;

/// Put the caller on the roster and replay the student-visible state:
/// current poll, current tally, and chat history. Teachers learn about
/// the new student through the roster broadcast inside `join_student`.
pub async fn handle_join(
    state: &SessionState,
    conn_id: &str,
    name: String,
) -> Option<ServerMessage> {
    state.join_student(conn_id.to_string(), name).await;

    state
        .send_to(
            conn_id,
            ServerMessage::CurrentPoll {
                poll: state.current_poll().await,
            },
        )
        .await;
    state
        .send_to(
            conn_id,
            ServerMessage::PollResults {
                results: state.current_results().await,
            },
        )
        .await;
    state
        .send_to(
            conn_id,
            ServerMessage::ChatHistory {
                messages: state.chat_history().await,
            },
        )
        .await;

    None
}

pub async fn handle_submit_answer(
    state: &SessionState,
    conn_id: &str,
    option: String,
) -> Option<ServerMessage> {
    if option.trim().is_empty() {
        return Some(ServerMessage::Error {
            code: "INVALID_ANSWER".to_string(),
            msg: "Answer must not be empty".to_string(),
        });
    }

    match state.submit_answer(conn_id, option).await {
        Ok(()) => None,
        Err(e) => Some(ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }),
    }
}
