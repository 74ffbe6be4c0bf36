use super::{SessionInner, SessionState};
use crate::protocol::ServerMessage;
use crate::types::*;

impl SessionInner {
    /// Roster as an ordered sequence for display. Join order, connection
    /// id as tie-break, so consecutive snapshots list students stably.
    pub fn students_snapshot(&self) -> Vec<Student> {
        let mut students: Vec<Student> = self.students.values().cloned().collect();
        students.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        students
    }
}

impl SessionState {
    /// Put a student on the roster. A re-join under the same connection
    /// overwrites the previous entry and clears its answered state.
    pub async fn join_student(&self, conn_id: ConnectionId, name: String) -> Student {
        let student = Student {
            id: conn_id.clone(),
            name,
            has_answered: false,
            answer: None,
            joined_at: chrono::Utc::now().to_rfc3339(),
        };

        let roster = {
            let mut inner = self.inner.write().await;
            inner.students.insert(conn_id, student.clone());
            inner.students_snapshot()
        };

        self.broadcast_to_teachers(ServerMessage::StudentsList { students: roster });

        tracing::info!("Student joined: {}", student.name);
        student
    }

    /// Remove a student and their answer record. Idempotent: returns None
    /// and publishes nothing when the connection was never on the roster,
    /// so a second disconnect event for the same connection is harmless.
    pub async fn remove_student(&self, conn_id: &str) -> Option<Student> {
        let (student, roster) = {
            let mut inner = self.inner.write().await;
            let student = inner.students.remove(conn_id)?;
            inner.answers.remove(conn_id);
            (student, inner.students_snapshot())
        };

        self.broadcast_to_teachers(ServerMessage::StudentsList { students: roster });

        tracing::info!("Student left: {}", student.name);
        Some(student)
    }

    /// Current roster snapshot
    pub async fn students(&self) -> Vec<Student> {
        self.inner.read().await.students_snapshot()
    }
}
