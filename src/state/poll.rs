use super::{tally, SessionError, SessionState};
use crate::protocol::ServerMessage;
use crate::types::*;
use std::collections::HashMap;

impl SessionState {
    /// Create a new poll and make it the current one.
    ///
    /// Rejected while the current poll is active and at least one student
    /// on the roster has not answered it. With an empty roster the active
    /// poll can never auto-complete, so replacing it is allowed.
    pub async fn create_poll(
        &self,
        question: String,
        options: Vec<String>,
        time_limit: u32,
    ) -> Result<Poll, SessionError> {
        let poll = {
            let mut inner = self.inner.write().await;

            if let Some(current) = &inner.poll {
                if current.is_active && inner.students.values().any(|s| !s.has_answered) {
                    return Err(SessionError::PollActive);
                }
            }

            let poll = Poll {
                id: ulid::Ulid::new().to_string(),
                question,
                options,
                time_limit,
                created_at: chrono::Utc::now().to_rfc3339(),
                is_active: true,
            };

            // Fresh answer slate for the new poll
            inner.answers.clear();
            for student in inner.students.values_mut() {
                student.has_answered = false;
                student.answer = None;
            }

            inner.poll = Some(poll.clone());
            poll
        };

        self.broadcast_to_all(ServerMessage::NewPoll { poll: poll.clone() });

        tracing::info!("New poll created: {}", poll.question);
        Ok(poll)
    }

    /// Record a student's answer for the current poll.
    ///
    /// All rejections are detected before any mutation. On success the
    /// fresh tally goes to everyone and the roster to teachers; if every
    /// student on the roster has now answered, the poll closes and the
    /// completion signal plus final tally follow.
    pub async fn submit_answer(
        &self,
        conn_id: &str,
        option: String,
    ) -> Result<(), SessionError> {
        let (results, roster, completed) = {
            let mut inner = self.inner.write().await;

            match &inner.poll {
                Some(poll) if poll.is_active => {}
                _ => return Err(SessionError::NoActivePoll),
            }
            let student = inner
                .students
                .get_mut(conn_id)
                .ok_or(SessionError::UnknownParticipant)?;
            if student.has_answered {
                return Err(SessionError::AlreadyAnswered);
            }

            student.has_answered = true;
            student.answer = Some(option.clone());
            let name = student.name.clone();
            inner.answers.insert(conn_id.to_string(), option.clone());

            tracing::info!("Answer submitted: {} -> {}", name, option);

            let results = match &inner.poll {
                Some(poll) => tally(poll, &inner.answers),
                None => return Err(SessionError::NoActivePoll),
            };
            let roster = inner.students_snapshot();

            // Completion check against the roster as it stands right now;
            // late joiners enlarge the denominator until they answer or
            // leave.
            let all_answered =
                !inner.students.is_empty() && inner.students.values().all(|s| s.has_answered);
            if all_answered {
                let completed_at = chrono::Utc::now().to_rfc3339();
                if let Some(poll) = inner.poll.as_mut() {
                    poll.is_active = false;
                    let record = PollRecord {
                        poll: poll.clone(),
                        results: results.clone(),
                        completed_at,
                    };
                    inner.history.push(record);
                }
            }

            (results, roster, all_answered)
        };

        self.broadcast_to_all(ServerMessage::PollResults {
            results: results.clone(),
        });
        self.broadcast_to_teachers(ServerMessage::StudentsList { students: roster });

        if completed {
            tracing::info!("All students answered, poll closed");
            self.broadcast_to_all(ServerMessage::PollCompleted);
            self.broadcast_to_all(ServerMessage::PollResults { results });
        }

        Ok(())
    }

    /// Close the current poll regardless of how many students answered.
    /// Appends the history record and publishes the completion signal
    /// followed by the final tally.
    pub async fn end_poll(&self) -> Result<PollRecord, SessionError> {
        let record = {
            let mut inner = self.inner.write().await;

            let results = match &inner.poll {
                Some(poll) if poll.is_active => tally(poll, &inner.answers),
                _ => return Err(SessionError::NoActivePoll),
            };
            let completed_at = chrono::Utc::now().to_rfc3339();

            if let Some(poll) = inner.poll.as_mut() {
                poll.is_active = false;
                let record = PollRecord {
                    poll: poll.clone(),
                    results,
                    completed_at,
                };
                inner.history.push(record.clone());
                record
            } else {
                return Err(SessionError::NoActivePoll);
            }
        };

        self.broadcast_to_all(ServerMessage::PollCompleted);
        self.broadcast_to_all(ServerMessage::PollResults {
            results: record.results.clone(),
        });

        tracing::info!("Poll ended: {}", record.poll.question);
        Ok(record)
    }

    /// The poll currently occupying the slot, active or not
    pub async fn current_poll(&self) -> Option<Poll> {
        self.inner.read().await.poll.clone()
    }

    /// Tally snapshot for the current poll; empty when no poll has run
    pub async fn current_results(&self) -> HashMap<String, u32> {
        let inner = self.inner.read().await;
        match &inner.poll {
            Some(poll) => tally(poll, &inner.answers),
            None => HashMap::new(),
        }
    }

    /// All closed polls with their final results, oldest first
    pub async fn poll_history(&self) -> Vec<PollRecord> {
        self.inner.read().await.history.clone()
    }
}
