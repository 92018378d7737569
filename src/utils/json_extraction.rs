//! JSON extraction for structured LLM replies.
//!
//! Generation and research replies are requested in JSON mode but still
//! arrive wrapped in markdown fences or with chatter around them. The
//! extraction order is:
//! 1. Strip ```` ```json ```` / ```` ``` ```` fences and try the remainder as-is
//! 2. Match the first balanced `{...}` object
//! 3. Fall back to the outermost `{` .. `}` span
//!
//! ```
//! use quant_forge::utils::json_extraction::extract_json_object;
//!
//! let reply = "```json\n{\"topics\": [\"Work & Time\"]}\n```";
//! assert_eq!(extract_json_object(reply).as_deref(), Some("{\"topics\": [\"Work & Time\"]}"));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static OUTERMOST_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("outermost-object regex is valid"));

/// Error type for JSON extraction failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum JsonExtractionError {
    #[error("JSON appears truncated: {unclosed_braces} unclosed braces. Partial: {partial_preview}...")]
    Truncated {
        partial_preview: String,
        unclosed_braces: usize,
    },
    #[error("No JSON object found in response. Content starts with: '{content_preview}'")]
    NotFound { content_preview: String },
}

/// Remove markdown code fences from a reply.
///
/// Mirrors what a human would do before pasting the reply into a JSON
/// parser: drop every ```` ```json ```` and ```` ``` ```` marker and trim.
pub fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Find the index of the brace closing the object that starts at `s[0]`.
///
/// Handles nesting, string literals and escape sequences.
pub fn find_matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

fn unclosed_braces(s: &str) -> usize {
    let mut depth: isize = 0;
    let mut in_string = false;
    let mut escape_next = false;
    for c in s.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth.max(0) as usize
}

fn is_json(candidate: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(candidate).is_ok()
}

fn preview(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Extract a JSON object from an LLM reply, reporting why it failed.
pub fn try_extract_json_object(content: &str) -> Result<String, JsonExtractionError> {
    let cleaned = strip_code_fences(content);

    if cleaned.starts_with('{') && is_json(&cleaned) {
        return Ok(cleaned);
    }

    if let Some(start) = cleaned.find('{') {
        let tail = &cleaned[start..];
        if let Some(end) = find_matching_brace(tail) {
            let candidate = &tail[..=end];
            if is_json(candidate) {
                return Ok(candidate.to_string());
            }
        }

        if let Some(m) = OUTERMOST_OBJECT.find(&cleaned) {
            if is_json(m.as_str()) {
                return Ok(m.as_str().to_string());
            }
        }

        let unclosed = unclosed_braces(tail);
        if unclosed > 0 {
            return Err(JsonExtractionError::Truncated {
                partial_preview: preview(tail, 100),
                unclosed_braces: unclosed,
            });
        }
    }

    Err(JsonExtractionError::NotFound {
        content_preview: preview(&cleaned, 50),
    })
}

/// Extract a JSON object from an LLM reply, if one is present.
pub fn extract_json_object(content: &str) -> Option<String> {
    try_extract_json_object(content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_json() {
        let input = r#"{"story": "A train leaves"}"#;
        assert_eq!(extract_json_object(input).as_deref(), Some(input));
    }

    #[test]
    fn test_json_code_block() {
        let input = "Here you go:\n```json\n{\"topics\": [\"Boats & Streams\"]}\n```\nEnjoy";
        assert_eq!(
            extract_json_object(input).as_deref(),
            Some(r#"{"topics": ["Boats & Streams"]}"#)
        );
    }

    #[test]
    fn test_braces_inside_strings() {
        let input = r#"noise {"story": "Set {A} has } items", "options": ["1","2","3","4"]} trailer"#;
        let json = extract_json_object(input).expect("should extract");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value["story"], "Set {A} has } items");
    }

    #[test]
    fn test_truncated_json() {
        let input = r#"{"story": "Two pipes fill a tank", "options": ["#;
        match try_extract_json_object(input) {
            Err(JsonExtractionError::Truncated {
                unclosed_braces, ..
            }) => assert_eq!(unclosed_braces, 1),
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found() {
        let err = try_extract_json_object("I cannot help with that.").unwrap_err();
        assert!(matches!(err, JsonExtractionError::NotFound { .. }));
    }

    #[test]
    fn test_find_matching_brace_unbalanced() {
        assert_eq!(find_matching_brace("{\"a\": {\"b\": 1}"), None);
        assert_eq!(find_matching_brace("{}"), Some(1));
    }
}
