// recommend-service-rs/src/stats.rs
//
// Normalization of raw LeetCode statistics payloads into a schema-stable
// canonical record.
//
// The upstream API is unversioned and has shipped the same logical data
// under several shapes (flat lower-case keys, capitalized keys, prefixed
// keys, a per-difficulty breakdown array). Each logical field is resolved
// through an ordered probe table: candidates are tried in a fixed
// precedence and the first present, non-null value wins. New upstream
// variants are handled by extending the tables, not by adding branches.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Cap on submission records carried into the model prompt.
pub const MAX_RECENT_SUBMISSIONS: usize = 200;

/// Cap on distinct failed-problem slugs carried into the model prompt.
pub const MAX_FAILED_TOPICS: usize = 10;

/// Problem difficulty as reported by the upstream API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "easy")]
    Easy,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "hard")]
    Hard,
    #[default]
    #[serde(rename = "unknown")]
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    fn from_raw(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Unknown,
        }
    }
}

/// One reduced submission entry. Derived from the raw payload per request
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub slug: String,
    pub title: String,
    pub verdict: String,
    pub difficulty: Difficulty,
}

/// The schema-stable statistics record feeding the model prompt. Counts are
/// always present and non-negative; a count the upstream never reported is
/// zero, not null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalStats {
    pub solved_easy: u64,
    pub solved_medium: u64,
    pub solved_hard: u64,
    pub recent_failed_topics: Vec<String>,
    pub recent_submissions: Vec<SubmissionRecord>,
}

/// One candidate location for a solved-count field.
enum CountProbe {
    /// Top-level key holding the count directly.
    Flat(&'static str),
    /// Per-difficulty breakdown array: the first element whose `difficulty`
    /// field equals the label supplies the parallel `count` field.
    Nested {
        array: &'static str,
        label: &'static str,
    },
}

const SOLVED_EASY_PROBES: &[CountProbe] = &[
    CountProbe::Flat("easy"),
    CountProbe::Flat("Easy"),
    CountProbe::Flat("solved_easy"),
    CountProbe::Flat("easySolved"),
    CountProbe::Nested {
        array: "acSubmissionNum",
        label: "Easy",
    },
];

const SOLVED_MEDIUM_PROBES: &[CountProbe] = &[
    CountProbe::Flat("medium"),
    CountProbe::Flat("Medium"),
    CountProbe::Flat("solved_medium"),
    CountProbe::Flat("mediumSolved"),
    CountProbe::Nested {
        array: "acSubmissionNum",
        label: "Medium",
    },
];

const SOLVED_HARD_PROBES: &[CountProbe] = &[
    CountProbe::Flat("hard"),
    CountProbe::Flat("Hard"),
    CountProbe::Flat("solved_hard"),
    CountProbe::Flat("hardSolved"),
    CountProbe::Nested {
        array: "acSubmissionNum",
        label: "Hard",
    },
];

const TOTAL_SOLVED_PROBES: &[CountProbe] = &[
    CountProbe::Flat("solved"),
    CountProbe::Flat("totalSolved"),
    CountProbe::Flat("solvedProblem"),
    CountProbe::Nested {
        array: "acSubmissionNum",
        label: "All",
    },
];

/// Container fields that may hold the submission list, in precedence order.
const SUBMISSION_LIST_KEYS: &[&str] = &["submissions", "data", "submissionList", "subs"];

const VERDICT_KEYS: &[&str] = &["status", "verdict", "statusDisplay"];
const TITLE_KEYS: &[&str] = &["title", "questionTitle"];
const SLUG_KEYS: &[&str] = &["titleSlug", "slug"];

fn non_negative_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)
}

/// Resolve a solved count through its probe table. Returns 0 when no
/// candidate holds a usable value.
fn probe_count(raw: Option<&Value>, probes: &[CountProbe]) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    for probe in probes {
        let found = match probe {
            CountProbe::Flat(key) => raw.get(*key),
            CountProbe::Nested { array, label } => raw
                .get(*array)
                .and_then(Value::as_array)
                .and_then(|entries| {
                    entries.iter().find(|entry| {
                        entry.get("difficulty").and_then(Value::as_str) == Some(*label)
                    })
                })
                .and_then(|entry| entry.get("count")),
        };
        if let Some(value) = found {
            if value.is_null() {
                continue;
            }
            if let Some(count) = non_negative_count(value) {
                return count;
            }
        }
    }
    0
}

/// First present string under the candidate keys, or empty.
fn probe_str(entry: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// Locate the submission entries inside a raw submissions payload. The
/// container is either a bare array or an object exposing the array under
/// one of several known fields; the first array found wins.
pub fn extract_submission_list(raw: &Value) -> &[Value] {
    if let Some(list) = raw.as_array() {
        return list;
    }
    for key in SUBMISSION_LIST_KEYS {
        if let Some(list) = raw.get(*key).and_then(Value::as_array) {
            return list;
        }
    }
    &[]
}

fn map_submission(entry: &Value) -> SubmissionRecord {
    let difficulty = entry
        .get("difficulty")
        .and_then(Value::as_str)
        .map(Difficulty::from_raw)
        .unwrap_or_default();

    SubmissionRecord {
        slug: probe_str(entry, SLUG_KEYS),
        title: probe_str(entry, TITLE_KEYS),
        verdict: probe_str(entry, VERDICT_KEYS),
        difficulty,
    }
}

/// Reduce a raw submissions payload to the capped recent list and the
/// deduplicated failed-slug set.
///
/// A verdict that does not start with "ac" (case-insensitively) counts as
/// failed, including the missing-verdict case. The prefix check is a
/// heuristic over a verdict vocabulary the upstream controls; it matches
/// every acceptance spelling observed so far ("Accepted", "AC", "accepted").
pub fn reduce_submissions(raw: Option<&Value>) -> (Vec<SubmissionRecord>, Vec<String>) {
    let mapped: Vec<SubmissionRecord> = match raw {
        Some(value) => extract_submission_list(value).iter().map(map_submission).collect(),
        None => Vec::new(),
    };

    // Failed slugs are collected over the full mapped list, before the
    // recent-submissions cap is applied.
    let mut seen = HashSet::new();
    let mut failed = Vec::new();
    for record in &mapped {
        if record.verdict.to_lowercase().starts_with("ac") {
            continue;
        }
        if record.slug.is_empty() {
            continue;
        }
        if seen.insert(record.slug.clone()) {
            failed.push(record.slug.clone());
            if failed.len() == MAX_FAILED_TOPICS {
                break;
            }
        }
    }

    let mut recent = mapped;
    recent.truncate(MAX_RECENT_SUBMISSIONS);

    (recent, failed)
}

/// Collapse the raw solved-counts and submissions payloads into
/// `CanonicalStats`. Missing payloads degrade to zero counts and empty
/// lists.
pub fn build_stats(solved: Option<&Value>, submissions: Option<&Value>) -> CanonicalStats {
    let (recent_submissions, recent_failed_topics) = reduce_submissions(submissions);

    CanonicalStats {
        solved_easy: probe_count(solved, SOLVED_EASY_PROBES),
        solved_medium: probe_count(solved, SOLVED_MEDIUM_PROBES),
        solved_hard: probe_count(solved, SOLVED_HARD_PROBES),
        recent_failed_topics,
        recent_submissions,
    }
}

/// Resolve the total solved count for the profile summary view.
pub fn probe_total_solved(raw: Option<&Value>) -> u64 {
    probe_count(raw, TOTAL_SOLVED_PROBES)
}
