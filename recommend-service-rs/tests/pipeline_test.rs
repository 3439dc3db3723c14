// Integration tests for the normalization -> prompt -> extraction pipeline,
// driven by canned upstream payloads instead of live endpoints.

use serde_json::json;

use recommend_service::extract::extract_json;
use recommend_service::prompt::assemble_prompt;
use recommend_service::stats::{build_stats, Difficulty, MAX_FAILED_TOPICS};
use recommend_service::validation::validate_recommend_request;

/// A solved payload in the nested-breakdown shape and a submissions payload
/// in the object-container shape, normalized together.
#[test]
fn test_stats_from_mixed_upstream_shapes() {
    let solved = json!({
        "acSubmissionNum": [
            { "difficulty": "All", "count": 58 },
            { "difficulty": "Easy", "count": 30 },
            { "difficulty": "Medium", "count": 21 },
            { "difficulty": "Hard", "count": 7 }
        ]
    });
    let submissions = json!({
        "submissionList": [
            { "titleSlug": "two-sum", "title": "Two Sum", "statusDisplay": "Accepted", "difficulty": "Easy" },
            { "titleSlug": "word-ladder", "title": "Word Ladder", "statusDisplay": "Time Limit Exceeded", "difficulty": "Hard" },
            { "titleSlug": "word-ladder", "title": "Word Ladder", "statusDisplay": "Wrong Answer", "difficulty": "Hard" }
        ]
    });

    let stats = build_stats(Some(&solved), Some(&submissions));

    assert_eq!(stats.solved_easy, 30);
    assert_eq!(stats.solved_medium, 21);
    assert_eq!(stats.solved_hard, 7);
    assert_eq!(stats.recent_submissions.len(), 3);
    assert_eq!(stats.recent_submissions[1].difficulty, Difficulty::Hard);
    // Duplicate failures collapse to one topic.
    assert_eq!(stats.recent_failed_topics, vec!["word-ladder"]);
}

/// An upstream outage on both endpoints degrades to the all-zero record,
/// never to an error.
#[test]
fn test_stats_degrade_on_total_upstream_failure() {
    let stats = build_stats(None, None);
    assert_eq!(stats.solved_easy, 0);
    assert_eq!(stats.solved_medium, 0);
    assert_eq!(stats.solved_hard, 0);
    assert!(stats.recent_failed_topics.is_empty());
    assert!(stats.recent_submissions.is_empty());
}

/// End to end: canned payloads through normalization, prompt assembly, and
/// extraction of a fenced model reply.
#[test]
fn test_pipeline_end_to_end_with_fenced_model_output() {
    let solved = json!({ "easySolved": 12, "mediumSolved": 4, "hardSolved": 0 });
    let submissions = json!([
        { "titleSlug": "binary-search", "title": "Binary Search", "status": "Accepted", "difficulty": "Easy" },
        { "titleSlug": "coin-change", "title": "Coin Change", "status": "Wrong Answer", "difficulty": "Medium" }
    ]);

    let stats = build_stats(Some(&solved), Some(&submissions));
    let payload = assemble_prompt("What should I work on this week?", stats);

    let serialized = serde_json::to_string(&payload).unwrap();
    let as_value: serde_json::Value = serde_json::from_str(&serialized).unwrap();
    assert_eq!(as_value["question"], "What should I work on this week?");
    assert_eq!(as_value["leetcode_stats"]["solved_easy"], 12);
    assert_eq!(as_value["leetcode_stats"]["recent_failed_topics"][0], "coin-change");

    let model_reply = "```json\n{\
        \"summary\": \"Good easy coverage, dynamic programming needs work.\",\
        \"pros\": [\"strong fundamentals\"],\
        \"cons\": [\"no hard problems solved\"],\
        \"next_question\": {\
            \"title\": \"House Robber\",\
            \"difficulty\": \"Medium\",\
            \"topics\": [\"dynamic programming\"],\
            \"reason\": \"Builds on the failed coin-change attempt.\"\
        }\
    }\n```";

    let parsed = extract_json(model_reply).expect("fenced JSON should parse");
    assert_eq!(parsed.next_question.as_ref().unwrap().title, "House Robber");
    assert_eq!(parsed.next_question.unwrap().difficulty, Difficulty::Medium);
}

/// Malformed model output leaves the caller with the raw text and no parse
/// result, without an error anywhere in the pipeline.
#[test]
fn test_pipeline_survives_malformed_model_output() {
    let raw = "I think you should try harder problems!";
    assert!(extract_json(raw).is_none());
    // The raw text itself is untouched and still presentable.
    assert_eq!(raw, "I think you should try harder problems!");
}

/// Failed-topic collection stays bounded and duplicate-free for adversarial
/// submission lists.
#[test]
fn test_failed_topics_bounded_for_large_duplicate_lists() {
    let entries: Vec<serde_json::Value> = (0..500)
        .map(|i| {
            json!({
                "titleSlug": format!("problem-{}", i % 25),
                "status": if i % 3 == 0 { "Accepted" } else { "Wrong Answer" }
            })
        })
        .collect();
    let submissions = serde_json::Value::Array(entries);

    let stats = build_stats(None, Some(&submissions));
    assert_eq!(stats.recent_failed_topics.len(), MAX_FAILED_TOPICS);
    let mut deduped = stats.recent_failed_topics.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), MAX_FAILED_TOPICS);
}

/// A request without a question never reaches the upstream or the model:
/// validation rejects it first.
#[test]
fn test_missing_question_rejected_before_any_fetch() {
    let body = json!({ "username": "alice", "sub_limit": 100 });
    assert!(validate_recommend_request(&body).is_err());
}
