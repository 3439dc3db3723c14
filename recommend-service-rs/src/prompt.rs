// recommend-service-rs/src/prompt.rs
// Assembly of the model input payload.

use serde::Serialize;

use crate::stats::CanonicalStats;

/// The exact object serialized into the model request's user message.
#[derive(Debug, Clone, Serialize)]
pub struct PromptPayload {
    pub question: String,
    pub leetcode_stats: CanonicalStats,
}

/// Combine the caller's free-text question with canonical statistics.
///
/// The question is carried verbatim; the request validator bounds its
/// length before this point, and the submission/topic caps applied during
/// reduction bound the rest of the payload.
pub fn assemble_prompt(question: &str, leetcode_stats: CanonicalStats) -> PromptPayload {
    PromptPayload {
        question: question.to_string(),
        leetcode_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Difficulty, SubmissionRecord, MAX_FAILED_TOPICS, MAX_RECENT_SUBMISSIONS};

    #[test]
    fn test_payload_shape() {
        let payload = assemble_prompt("what next?", CanonicalStats::default());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["question"], "what next?");
        assert_eq!(value["leetcode_stats"]["solved_easy"], 0);
        assert!(value["leetcode_stats"]["recent_submissions"].is_array());
    }

    #[test]
    fn test_payload_size_bounded_at_caps() {
        // A payload maxed out at both caps with generously sized fields must
        // stay well under the model's input limit.
        let record = SubmissionRecord {
            slug: "x".repeat(60),
            title: "y".repeat(80),
            verdict: "Time Limit Exceeded".to_string(),
            difficulty: Difficulty::Medium,
        };
        let stats = CanonicalStats {
            solved_easy: 9999,
            solved_medium: 9999,
            solved_hard: 9999,
            recent_failed_topics: vec!["z".repeat(60); MAX_FAILED_TOPICS],
            recent_submissions: vec![record; MAX_RECENT_SUBMISSIONS],
        };
        let payload = assemble_prompt(&"q".repeat(8192), stats);
        let serialized = serde_json::to_string(&payload).unwrap();
        assert!(serialized.len() < 128 * 1024, "payload was {} bytes", serialized.len());
    }
}
