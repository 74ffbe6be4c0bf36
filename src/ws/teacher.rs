//! Teacher command handlers
//!
//! Authorization is checked in the dispatch layer before these are called.

use crate::protocol::ServerMessage;
use crate::state::SessionState;

/// Catch-up replay for a newly joined teacher: current poll, current
/// tally, roster, and the full chat log, delivered to this connection
/// only.
pub async fn handle_join(state: &SessionState, conn_id: &str) -> Option<ServerMessage> {
    tracing::info!("Teacher joined");

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
            ServerMessage::StudentsList {
                students: state.students().await,
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

pub async fn handle_create_poll(
    state: &SessionState,
    question: String,
    options: Vec<String>,
    time_limit_seconds: u32,
) -> Option<ServerMessage> {
    if question.trim().is_empty() || options.len() < 2 {
        return Some(ServerMessage::Error {
            code: "INVALID_POLL".to_string(),
            msg: "A poll needs a question and at least two options".to_string(),
        });
    }

    match state.create_poll(question, options, time_limit_seconds).await {
        Ok(_) => None,
        Err(e) => Some(ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }),
    }
}

pub async fn handle_end_poll(state: &SessionState) -> Option<ServerMessage> {
    match state.end_poll().await {
        Ok(_) => None,
        Err(e) => Some(ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }),
    }
}

/// Notify and sever the target connection. The roster entry is removed by
/// the disconnect cleanup that follows, so it may survive one more
/// snapshot.
pub async fn handle_kick_student(
    state: &SessionState,
    student_id: String,
) -> Option<ServerMessage> {
    tracing::info!("Kicking student connection: {}", student_id);

    if state.kick_connection(&student_id).await {
        None
    } else {
        Some(ServerMessage::Error {
            code: "UNKNOWN_STUDENT".to_string(),
            msg: "No such connection".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_poll_rejects_short_option_list() {
        let state = SessionState::new();

        let result =
            handle_create_poll(&state, "Q?".to_string(), vec!["only".to_string()], 60).await;

        match result {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "INVALID_POLL"),
            other => panic!("Expected Error, got {:?}", other),
        }
        assert!(state.current_poll().await.is_none());
    }

    #[tokio::test]
    async fn test_create_poll_rejects_blank_question() {
        let state = SessionState::new();

        let result = handle_create_poll(
            &state,
            "   ".to_string(),
            vec!["A".to_string(), "B".to_string()],
            60,
        )
        .await;

        match result {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "INVALID_POLL"),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_poll_reports_poll_active() {
        let state = SessionState::new();
        state.join_student("conn1".to_string(), "Alice".to_string()).await;
        handle_create_poll(
            &state,
            "Q1?".to_string(),
            vec!["A".to_string(), "B".to_string()],
            60,
        )
        .await;

        let result = handle_create_poll(
            &state,
            "Q2?".to_string(),
            vec!["X".to_string(), "Y".to_string()],
            60,
        )
        .await;

        match result {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "POLL_ACTIVE"),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_end_poll_without_poll() {
        let state = SessionState::new();

        let result = handle_end_poll(&state).await;

        match result {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "NO_ACTIVE_POLL"),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_kick_unknown_connection() {
        let state = SessionState::new();

        let result = handle_kick_student(&state, "ghost".to_string()).await;

        match result {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "UNKNOWN_STUDENT"),
            other => panic!("Expected Error, got {:?}", other),
        }
    }
}
