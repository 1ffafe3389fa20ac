//! Parse model output into JSON

use crate::error::ExtractorError;
use serde_json::Value;

/// Parse the model's raw response text
///
/// Structured output should already be bare JSON, but a fenced code block
/// is tolerated.
pub fn parse_model_response(response: &str) -> Result<Value, ExtractorError> {
    let json_str = extract_json(response);
    if json_str.is_empty() {
        return Err(ExtractorError::EmptyResponse);
    }

    Ok(serde_json::from_str(json_str)?)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the info string (```json): up to the end of the first line, or
    // just the word itself when the whole block sits on one line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
    };
    body.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_json() {
        let value = parse_model_response(r#"{"a": {"value": 1, "source": null}}"#).unwrap();
        assert_eq!(value, json!({"a": {"value": 1, "source": null}}));
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "```json\n{\"a\": {\"value\": \"x\", \"source\": \"f.pdf\"}}\n```";
        let value = parse_model_response(response).unwrap();
        assert_eq!(value["a"]["source"], "f.pdf");
    }

    #[test]
    fn test_parse_fence_without_language() {
        let value = parse_model_response("```\n{}\n```").unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_parse_single_line_fence() {
        let value = parse_model_response("```json {\"a\": {\"value\": 2, \"source\": null}}```").unwrap();
        assert_eq!(value, json!({"a": {"value": 2, "source": null}}));

        let value = parse_model_response("```{}```").unwrap();
        assert_eq!(value, json!({}));
        assert!(matches!(parse_model_response("```json```"), Err(ExtractorError::EmptyResponse)));
    }

    #[test]
    fn test_empty_response() {
        assert!(matches!(parse_model_response(""), Err(ExtractorError::EmptyResponse)));
        assert!(matches!(parse_model_response("   \n"), Err(ExtractorError::EmptyResponse)));
        assert!(matches!(parse_model_response("```json\n```"), Err(ExtractorError::EmptyResponse)));
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_model_response("This is not JSON");
        assert!(matches!(result, Err(ExtractorError::JsonParse(_))));
    }
}
