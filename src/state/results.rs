use crate::types::*;
use std::collections::HashMap;

/// Derive the vote tally for a poll from the raw answer record.
///
/// Every option appears in the result, zero-filled if unvoted. Answers
/// that match no option are ignored (recorded as abstain, not counted).
/// Recomputed on every call; never cached.
pub fn tally(poll: &Poll, answers: &HashMap<ConnectionId, String>) -> HashMap<String, u32> {
    let mut results: HashMap<String, u32> = poll
        .options
        .iter()
        .map(|option| (option.clone(), 0))
        .collect();

    for answer in answers.values() {
        if let Some(count) = results.get_mut(answer) {
            *count += 1;
        }
    }

    results
}
