//! Decode-and-validate for model output.
//!
//! Model replies are untrusted: every field is checked and coerced into a
//! typed record here, or the whole reply is rejected.

use crate::store::{Analysis, Audience, Category, Difficulty, EpisodeUseCase, Intent};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON {expected}, got {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn vocab<T: Default>(map: &Map<String, Value>, key: &str, parse: fn(&str) -> Option<T>) -> T {
    map.get(key)
        .and_then(Value::as_str)
        .and_then(parse)
        .unwrap_or_default()
}

/// Decode one episode analysis from fence-stripped model output.
///
/// Unknown vocabulary values fall back to `other` / `everyone` /
/// `intermediate`; use cases without a title are dropped.
pub fn decode_analysis(raw: &str) -> Result<Analysis, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(DecodeError::Shape {
                expected: "object",
                found: kind(&other),
            })
        }
    };

    let use_cases = match map.get("use_cases") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(decode_use_case)
            .collect(),
        _ => Vec::new(),
    };

    Ok(Analysis {
        guest_name: text(&map, "guest_name"),
        guest_role: text(&map, "guest_role"),
        summary: text(&map, "summary").unwrap_or_default(),
        key_takeaways: text_list(&map, "key_takeaways"),
        use_cases,
        tools_mentioned: text_list(&map, "tools_mentioned"),
        notable_quotes: text_list(&map, "notable_quotes"),
    })
}

fn decode_use_case(map: &Map<String, Value>) -> Option<EpisodeUseCase> {
    Some(EpisodeUseCase {
        title: text(map, "title")?,
        description: text(map, "description").unwrap_or_default(),
        tools: text_list(map, "tools"),
        category: vocab(map, "category", Category::parse),
        audience: vocab(map, "audience", Audience::parse),
        difficulty: vocab(map, "difficulty", Difficulty::parse),
    })
}

/// One per-use-case verdict from the enrichment pass. Intents are already
/// filtered to the known taxonomy but not yet deduplicated or capped.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgment {
    pub index: usize,
    pub intents: Vec<Intent>,
    pub is_pick: bool,
    pub pick_reason: Option<String>,
}

/// Decode the enrichment reply: a JSON array of judgments. Items without a
/// non-negative integer `index` are dropped.
pub fn decode_judgments(raw: &str) -> Result<Vec<Judgment>, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(DecodeError::Shape {
                expected: "array",
                found: kind(&other),
            })
        }
    };

    Ok(items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(decode_judgment)
        .collect())
}

fn decode_judgment(map: &Map<String, Value>) -> Option<Judgment> {
    let index = usize::try_from(map.get("index")?.as_u64()?).ok()?;

    let intents = match map.get("intents") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(Intent::parse)
            .collect(),
        _ => Vec::new(),
    };

    Some(Judgment {
        index,
        intents,
        is_pick: map.get("is_pick") == Some(&Value::Bool(true)),
        pick_reason: text(map, "pick_reason"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Analyses
    // =========================================================================

    #[test]
    fn test_decode_full_analysis() {
        let raw = r#"{
            "guest_name": "Jane Doe",
            "guest_role": null,
            "summary": "Jane shows how she ships.",
            "key_takeaways": ["one", "two"],
            "use_cases": [{
                "title": "Draft PRDs with Claude",
                "description": "Turns notes into a PRD",
                "tools": ["Claude"],
                "category": "writing",
                "audience": "product-managers",
                "difficulty": "beginner"
            }],
            "tools_mentioned": ["Claude", "Cursor"],
            "notable_quotes": ["Ship it"]
        }"#;

        let analysis = decode_analysis(raw).unwrap();
        assert_eq!(analysis.guest_name.as_deref(), Some("Jane Doe"));
        assert_eq!(analysis.guest_role, None);
        assert_eq!(analysis.key_takeaways.len(), 2);
        assert_eq!(analysis.use_cases.len(), 1);
        assert_eq!(analysis.use_cases[0].category, Category::Writing);
        assert_eq!(analysis.use_cases[0].audience, Audience::ProductManagers);
        assert_eq!(analysis.use_cases[0].difficulty, Difficulty::Beginner);
    }

    #[test]
    fn test_invalid_vocabulary_falls_back_to_defaults() {
        let raw = r#"{"summary": "s", "use_cases": [
            {"title": "T", "description": "D", "category": "cooking", "audience": 7, "difficulty": "expert"}
        ]}"#;

        let uc = &decode_analysis(raw).unwrap().use_cases[0];
        assert_eq!(uc.category, Category::Other);
        assert_eq!(uc.audience, Audience::Everyone);
        assert_eq!(uc.difficulty, Difficulty::Intermediate);
        assert!(uc.tools.is_empty());
    }

    #[test]
    fn test_use_cases_without_title_are_dropped() {
        let raw = r#"{"use_cases": [
            {"description": "no title"},
            {"title": "   ", "description": "blank title"},
            "not an object",
            {"title": "Kept"}
        ]}"#;

        let analysis = decode_analysis(raw).unwrap();
        assert_eq!(analysis.use_cases.len(), 1);
        assert_eq!(analysis.use_cases[0].title, "Kept");
        assert_eq!(analysis.summary, "");
    }

    #[test]
    fn test_non_string_list_items_are_dropped() {
        let raw = r#"{"tools_mentioned": ["Claude", 3, null, {"x": 1}, "Cursor"], "key_takeaways": "one"}"#;
        let analysis = decode_analysis(raw).unwrap();
        assert_eq!(analysis.tools_mentioned, vec!["Claude", "Cursor"]);
        assert!(analysis.key_takeaways.is_empty());
    }

    #[test]
    fn test_non_object_analysis_is_rejected() {
        let err = decode_analysis("[1, 2]").unwrap_err();
        assert!(matches!(err, DecodeError::Shape { expected: "object", found: "array" }));
        assert!(matches!(decode_analysis("{oops"), Err(DecodeError::Json(_))));
    }

    // =========================================================================
    // Judgments
    // =========================================================================

    #[test]
    fn test_decode_judgments_filters_unknown_intents() {
        let raw = r#"[
            {"index": 0, "intents": ["automate", "be-awesome"], "is_pick": false, "pick_reason": null},
            {"index": 1, "intents": ["nonsense"], "is_pick": true, "pick_reason": "Clever"}
        ]"#;

        let judgments = decode_judgments(raw).unwrap();
        assert_eq!(judgments.len(), 2);
        assert_eq!(judgments[0].intents, vec![Intent::Automate]);
        assert!(judgments[1].intents.is_empty());
        assert!(judgments[1].is_pick);
        assert_eq!(judgments[1].pick_reason.as_deref(), Some("Clever"));
    }

    #[test]
    fn test_is_pick_requires_json_true() {
        let raw = r#"[
            {"index": 0, "is_pick": "true"},
            {"index": 1, "is_pick": 1},
            {"index": 2}
        ]"#;
        let judgments = decode_judgments(raw).unwrap();
        assert!(judgments.iter().all(|j| !j.is_pick));
    }

    #[test]
    fn test_judgments_without_valid_index_are_dropped() {
        let raw = r#"[
            {"index": -1, "intents": ["tinker"]},
            {"index": "2", "intents": ["tinker"]},
            {"index": 1.5, "intents": ["tinker"]},
            {"intents": ["tinker"]},
            {"index": 4, "intents": ["tinker"]}
        ]"#;
        let judgments = decode_judgments(raw).unwrap();
        assert_eq!(judgments.len(), 1);
        assert_eq!(judgments[0].index, 4);
    }

    #[test]
    fn test_non_array_judgments_are_rejected() {
        let err = decode_judgments(r#"{"index": 0}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Shape { expected: "array", found: "object" }));
    }
}
