//! Model-output JSON extraction.
//!
//! Models wrap JSON in prose and code fences no matter how firmly the prompt
//! says not to. This finds the object text; parsing is the caller's job.

use std::sync::OnceLock;

use regex::Regex;

fn json_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    // Lazy body up to the first `}` that is followed by a closing fence, so
    // nested braces inside the object are kept whole.
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```[ \t]*(?i:json)[ \t]*\r?\n?\s*(\{.*?\})\s*```")
            .expect("fence pattern is valid")
    })
}

/// Returns the text of the JSON object inside `text`, or `None` if there is none.
///
/// Policy, in order:
/// 1. the object inside the first ```json fenced block;
/// 2. the span from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(body) = json_fence().captures(text).and_then(|c| c.get(1)) {
        return Some(body.as_str());
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_returns_exact_object() {
        let object = "{\n  \"name\": \"Jane Doe\",\n  \"skills\": [\"Rust\"]\n}";
        let input = format!("Here is your resume:\n```json\n{object}\n```\nGood luck!");
        assert_eq!(extract_json(&input), Some(object));
    }

    #[test]
    fn test_fence_label_is_case_insensitive() {
        let input = "```JSON\n{\"a\": 1}\n```";
        assert_eq!(extract_json(input), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_fenced_block_preferred_over_stray_braces() {
        let input = "Template uses {placeholders}.\n```json\n{\"a\": {\"b\": 2}}\n```\nBye {x}";
        assert_eq!(extract_json(input), Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn test_nested_objects_inside_fence_kept_whole() {
        let object = r#"{"education": [{"degree": "BS", "year": "2020"}], "projects": [{"name": "X", "details": []}]}"#;
        let input = format!("```json\n{object}\n```");
        assert_eq!(extract_json(&input), Some(object));
    }

    #[test]
    fn test_unfenced_object_uses_outer_braces() {
        let input = "Sure! {\"name\": \"Jane\", \"nested\": {\"k\": 1}} Hope that helps.";
        assert_eq!(
            extract_json(input),
            Some("{\"name\": \"Jane\", \"nested\": {\"k\": 1}}")
        );
    }

    #[test]
    fn test_unlabelled_fence_falls_back_to_braces() {
        let input = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(input), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_no_braces_is_none() {
        assert_eq!(extract_json("I'm sorry, I cannot produce a resume."), None);
        assert_eq!(extract_json(""), None);
    }

    #[test]
    fn test_reversed_braces_is_none() {
        assert_eq!(extract_json("} nothing here {"), None);
    }

    #[test]
    fn test_extracted_text_may_still_be_invalid_json() {
        let extracted = extract_json("{not json at all}").unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(extracted).is_err());
    }
}
