//! Helpers shared by the services that ask the text generator for JSON

use serde_json::{json, Value};
use tracing::warn;

use crate::clients::generation::GenerationError;
use crate::error::ServiceError;

/// Drop a surrounding markdown code fence, with or without a `json` tag
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse a reply as JSON, or `None` when it is prose
pub fn parse_json_reply(text: &str) -> Option<Value> {
    match serde_json::from_str(strip_code_fences(text)) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("AI reply is not JSON: {}", e);
            None
        }
    }
}

/// Parsed reply, or the raw text under `analysis`
pub fn reply_or_analysis(text: &str) -> Value {
    parse_json_reply(text).unwrap_or_else(|| json!({ "analysis": text }))
}

/// Error used when an AI-backed service has no generator configured
pub fn missing_generator() -> ServiceError {
    GenerationError::MissingApiKey { var: "OPENAI_API_KEY".to_string() }.into()
}

/// Render an optional loosely-typed value for a prompt
pub fn describe(value: Option<&Value>, missing: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => missing.to_string(),
    }
}

/// Comma-joined list, or `missing` when absent or empty
pub fn describe_list(items: Option<&Vec<String>>, missing: &str) -> String {
    match items {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => missing.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```JSON{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_reply_or_analysis() {
        assert_eq!(reply_or_analysis("[1,2]"), json!([1, 2]));
        assert_eq!(reply_or_analysis("Drink water"), json!({ "analysis": "Drink water" }));
    }

    #[test]
    fn test_describe_values() {
        assert_eq!(describe(Some(&json!(34)), "Not specified"), "34");
        assert_eq!(describe(Some(&json!("")), "Not specified"), "Not specified");
        assert_eq!(describe(None, "Not specified"), "Not specified");
        assert_eq!(describe_list(Some(&vec![]), "None"), "None");
        assert_eq!(describe_list(Some(&vec!["asthma".to_string(), "gerd".to_string()]), "None"), "asthma, gerd");
    }
}
