use serde_json::{Map, Value};

use crate::normalizer::traits::NormalizeStrategy;

const FENCE: &str = "```";

/// Parse `text` as exactly one JSON object.
fn parse_object(text: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(format!("expected a JSON object, found {}", value_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Remove Markdown code-fence markers around `text`.
///
/// Handles an opening fence of three or more backticks with an optional
/// language tag (```` ```json ````), a closing fence, and the surrounding
/// whitespace. Text without fences is returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix(FENCE) {
        let rest = rest.trim_start_matches('`');
        let tag_end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')))
            .unwrap_or(rest.len());
        // Only drop the tag when it is followed by a separator, so a fenced
        // body starting right after the backticks stays intact.
        let after_tag = &rest[tag_end..];
        body = if after_tag.is_empty() || after_tag.starts_with(char::is_whitespace) {
            after_tag
        } else {
            rest
        };
    }

    if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
        body = rest.trim_end_matches('`');
    }

    body.trim()
}

/// Parse the whole response as a JSON object.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectParse;

impl NormalizeStrategy for DirectParse {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn extract(&self, raw: &str) -> Result<Map<String, Value>, String> {
        parse_object(raw.trim())
    }
}

/// Strip code-fence markers, then parse what is left.
#[derive(Debug, Default, Clone, Copy)]
pub struct FenceStrip;

impl NormalizeStrategy for FenceStrip {
    fn name(&self) -> &'static str {
        "fence_strip"
    }

    fn extract(&self, raw: &str) -> Result<Map<String, Value>, String> {
        let stripped = strip_code_fence(raw);
        if stripped.len() == raw.trim().len() {
            return Err("no code fence markers found".to_string());
        }
        parse_object(stripped)
    }
}

/// Parse the span from the first `{` to the last `}` of the original text.
///
/// Recovers an object embedded in prose, e.g. `Sure! {...} Hope this helps.`
#[derive(Debug, Default, Clone, Copy)]
pub struct BraceExtraction;

impl NormalizeStrategy for BraceExtraction {
    fn name(&self) -> &'static str {
        "brace_extraction"
    }

    fn extract(&self, raw: &str) -> Result<Map<String, Value>, String> {
        let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
            return Err("no '{' ... '}' span found".to_string());
        };
        if end < start {
            return Err("last '}' precedes first '{'".to_string());
        }
        parse_object(&raw[start..=end])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const OBJECT: &str = r#"{"recyclable": true, "type": "glass"}"#;

    #[test]
    fn test_strip_code_fence_with_language_tag() {
        let fenced = format!("```json\n{}\n```", OBJECT);
        assert_eq!(strip_code_fence(&fenced), OBJECT);
    }

    #[test]
    fn test_strip_code_fence_without_tag() {
        let fenced = format!("  ```\n{}\n```  \n", OBJECT);
        assert_eq!(strip_code_fence(&fenced), OBJECT);
    }

    #[test]
    fn test_strip_code_fence_single_line() {
        let fenced = format!("```{}```", OBJECT);
        assert_eq!(strip_code_fence(&fenced), OBJECT);

        let tagged = format!("```JSON {}```", OBJECT);
        assert_eq!(strip_code_fence(&tagged), OBJECT);
    }

    #[test]
    fn test_strip_code_fence_leaves_plain_text() {
        assert_eq!(strip_code_fence("  just text \n"), "just text");
    }

    #[test]
    fn test_direct_parse_rejects_non_objects() {
        let err = DirectParse.extract("[1, 2, 3]").unwrap_err();
        assert!(err.contains("an array"), "unexpected diagnostic: {}", err);
        assert!(DirectParse.extract("not json").is_err());
    }

    #[test]
    fn test_fence_strip_requires_fence() {
        let err = FenceStrip.extract(OBJECT).unwrap_err();
        assert_eq!(err, "no code fence markers found");

        let object = FenceStrip
            .extract(&format!("```json\n{}\n```", OBJECT))
            .unwrap();
        assert_eq!(object.get("type"), Some(&json!("glass")));
    }

    #[test]
    fn test_brace_extraction_from_prose() {
        let text = format!("Here is my answer: {} Let me know!", OBJECT);
        let object = BraceExtraction.extract(&text).unwrap();
        assert_eq!(object.get("recyclable"), Some(&json!(true)));
    }

    #[test]
    fn test_brace_extraction_without_braces() {
        assert!(BraceExtraction.extract("no json here").is_err());
        assert_eq!(
            BraceExtraction.extract("} backwards {").unwrap_err(),
            "last '}' precedes first '{'"
        );
    }

    #[test]
    fn test_brace_extraction_with_trailing_text_after_fence() {
        let text = format!("```json\n{}\n```\nHope this helps.", OBJECT);
        assert!(FenceStrip.extract(&text).is_err());
        assert!(BraceExtraction.extract(&text).is_ok());
    }
}
