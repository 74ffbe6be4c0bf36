//! WebSocket message dispatch
//!
//! Entry point for handling client messages. Role authorization for
//! teacher commands is checked here, then dispatched to the role-specific
//! handler modules. Error replies go to the issuing connection only.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::SessionState;
use crate::types::Role;

use super::{student, teacher};

/// Macro to check teacher authorization and return early if unauthorized
macro_rules! check_teacher {
    ($role:expr, $action:expr) => {
        if *$role != Some(Role::Teacher) {
            return Some(ServerMessage::Error {
                code: "UNAUTHORIZED".to_string(),
                msg: format!("Only the teacher can {}", $action),
            });
        }
    };
}

/// Handle a client message and return an optional direct response
pub async fn handle_message(
    msg: ClientMessage,
    conn_id: &str,
    role: &mut Option<Role>,
    state: &SessionState,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::JoinTeacher => {
            *role = Some(Role::Teacher);
            teacher::handle_join(state, conn_id).await
        }

        ClientMessage::JoinStudent { name } => {
            *role = Some(Role::Student);
            student::handle_join(state, conn_id, name).await
        }

        ClientMessage::SubmitAnswer { option } => {
            student::handle_submit_answer(state, conn_id, option).await
        }

        ClientMessage::GetPollHistory => Some(ServerMessage::PollHistory {
            polls: state.poll_history().await,
        }),

        ClientMessage::SendMessage {
            sender_name,
            sender_role,
            text,
        } => {
            state.append_message(sender_name, sender_role, text).await;
            None
        }

        // Teacher-only commands (authorization checked before dispatch)
        ClientMessage::CreatePoll {
            question,
            options,
            time_limit_seconds,
        } => {
            check_teacher!(role, "create polls");
            teacher::handle_create_poll(state, question, options, time_limit_seconds).await
        }

        ClientMessage::EndPoll => {
            check_teacher!(role, "end polls");
            teacher::handle_end_poll(state).await
        }

        ClientMessage::KickStudent { student_id } => {
            check_teacher!(role, "kick students");
            teacher::handle_kick_student(state, student_id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unauthorized_teacher_command() {
        let state = SessionState::new();
        let mut role = Some(Role::Student);

        let result = handle_message(
            ClientMessage::CreatePoll {
                question: "Q?".to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                time_limit_seconds: 60,
            },
            "conn1",
            &mut role,
            &state,
        )
        .await;

        match result {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "UNAUTHORIZED"),
            other => panic!("Expected Error, got {:?}", other),
        }
        assert!(state.current_poll().await.is_none());
    }

    #[tokio::test]
    async fn test_unidentified_connection_cannot_end_poll() {
        let state = SessionState::new();
        let mut role = None;

        let result = handle_message(ClientMessage::EndPoll, "conn1", &mut role, &state).await;

        match result {
            Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "UNAUTHORIZED"),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_join_teacher_sets_role() {
        let state = SessionState::new();
        let mut role = None;

        handle_message(ClientMessage::JoinTeacher, "conn1", &mut role, &state).await;
        assert_eq!(role, Some(Role::Teacher));
    }

    #[tokio::test]
    async fn test_join_student_sets_role_and_roster() {
        let state = SessionState::new();
        let mut role = None;

        handle_message(
            ClientMessage::JoinStudent {
                name: "Alice".to_string(),
            },
            "conn1",
            &mut role,
            &state,
        )
        .await;

        assert_eq!(role, Some(Role::Student));
        assert_eq!(state.students().await.len(), 1);
    }

    #[tokio::test]
    async fn test_get_poll_history_replies_directly() {
        let state = SessionState::new();
        let mut role = Some(Role::Teacher);

        handle_message(
            ClientMessage::CreatePoll {
                question: "Q?".to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                time_limit_seconds: 60,
            },
            "conn1",
            &mut role,
            &state,
        )
        .await;
        handle_message(ClientMessage::EndPoll, "conn1", &mut role, &state).await;

        let result =
            handle_message(ClientMessage::GetPollHistory, "conn1", &mut role, &state).await;

        match result {
            Some(ServerMessage::PollHistory { polls }) => assert_eq!(polls.len(), 1),
            other => panic!("Expected PollHistory, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_message_appends_and_returns_nothing() {
        let state = SessionState::new();
        let mut role = Some(Role::Student);

        let result = handle_message(
            ClientMessage::SendMessage {
                sender_name: "Alice".to_string(),
                sender_role: Role::Student,
                text: "hello".to_string(),
            },
            "conn1",
            &mut role,
            &state,
        )
        .await;

        assert!(result.is_none());
        assert_eq!(state.chat_history().await.len(), 1);
    }
}
