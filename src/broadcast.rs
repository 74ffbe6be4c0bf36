use crate::state::SessionState;
use std::time::Duration;

/// Spawn a background task that ends the active poll once its advisory
/// time limit has elapsed. The session state itself keeps no timers; this
/// watcher drives the ordinary end-poll path, so the history append and
/// the completion broadcasts are identical to a manual end.
pub fn spawn_deadline_watcher(state: SessionState) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(500)).await;

            let poll = match state.current_poll().await {
                Some(p) if p.is_active => p,
                _ => continue,
            };

            let created_at = match chrono::DateTime::parse_from_rfc3339(&poll.created_at) {
                Ok(t) => t.with_timezone(&chrono::Utc),
                Err(e) => {
                    tracing::error!("Unparseable poll timestamp {}: {}", poll.created_at, e);
                    continue;
                }
            };
            let deadline = created_at + chrono::Duration::seconds(i64::from(poll.time_limit));

            if chrono::Utc::now() >= deadline {
                tracing::info!("Time limit reached, ending poll: {}", poll.question);
                // The poll may have closed between the check and the end;
                // that rejection is fine to drop
                let _ = state.end_poll().await;
            }
        }
    });
}
