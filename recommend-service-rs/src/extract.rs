// recommend-service-rs/src/extract.rs
// Tolerant extraction of structured recommendations from model output.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::stats::Difficulty;

lazy_static! {
    /// Code-fence markers the model wraps JSON in despite instructions.
    static ref FENCE_MARKERS: Regex = Regex::new(r"```(?:json)?").expect("Invalid fence pattern");
}

/// Structured recommendation parsed from model output. Every field is
/// defaulted so shape drift in the model's JSON degrades to empty fields;
/// only output that is not JSON at all is treated as unparseable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecommendation {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub next_question: Option<NextQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NextQuestion {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub reason: String,
}

/// Strip fence markers and parse the model's text as strict JSON.
///
/// Returns `None` when the cleaned text is not valid JSON. The caller keeps
/// the raw text, so a parse failure degrades the response to raw-only
/// instead of failing the request.
pub fn extract_json(text: &str) -> Option<ParsedRecommendation> {
    let cleaned = FENCE_MARKERS.replace_all(text, "");
    let cleaned = cleaned.trim();
    match serde_json::from_str(cleaned) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            log::warn!("Model output is not valid JSON: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "summary": "Solid on easy problems, shaky on graphs.",
        "pros": ["consistent practice"],
        "cons": ["few hard problems"],
        "next_question": {
            "title": "Course Schedule",
            "difficulty": "Medium",
            "topics": ["graph", "topological sort"],
            "reason": "Targets the failed graph submissions."
        }
    }"#;

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let fenced = format!("```json\n{}\n```", SAMPLE);
        let from_fenced = extract_json(&fenced).unwrap();
        let from_bare = extract_json(SAMPLE).unwrap();
        assert_eq!(from_fenced, from_bare);
        assert_eq!(from_fenced.next_question.unwrap().difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_plain_fence_without_language_tag() {
        let fenced = format!("```\n{}\n```", SAMPLE);
        assert_eq!(extract_json(&fenced), extract_json(SAMPLE));
    }

    #[test]
    fn test_malformed_output_returns_none() {
        assert!(extract_json("Sorry, I cannot answer that.").is_none());
        assert!(extract_json("").is_none());
        assert!(extract_json("```json\nnot json\n```").is_none());
    }

    #[test]
    fn test_shape_drift_degrades_to_defaults() {
        let parsed = extract_json(r#"{ "summary": "ok", "unexpected": 42 }"#).unwrap();
        assert_eq!(parsed.summary, "ok");
        assert!(parsed.pros.is_empty());
        assert!(parsed.next_question.is_none());
    }

    #[test]
    fn test_unknown_difficulty_falls_back() {
        let parsed = extract_json(r#"{ "next_question": { "difficulty": "Insane" } }"#).unwrap();
        assert_eq!(parsed.next_question.unwrap().difficulty, Difficulty::Unknown);
    }
}
