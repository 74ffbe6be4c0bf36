use super::SessionState;
use crate::protocol::ServerMessage;
use crate::types::*;

impl SessionState {
    /// Append a chat message and publish it to everyone. The log is
    /// append-only; arrival order at the session is the total order.
    pub async fn append_message(
        &self,
        sender_name: String,
        sender_role: Role,
        text: String,
    ) -> ChatMessage {
        let message = ChatMessage {
            id: ulid::Ulid::new().to_string(),
            sender_name,
            sender_role,
            text,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        self.inner.write().await.chat.push(message.clone());
        self.broadcast_to_all(ServerMessage::NewMessage {
            message: message.clone(),
        });

        message
    }

    /// Full chat log in arrival order, for replay on join
    pub async fn chat_history(&self) -> Vec<ChatMessage> {
        self.inner.read().await.chat.clone()
    }
}
