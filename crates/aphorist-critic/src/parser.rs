//! Parse model output into a critique

use crate::error::ResponseParseError;
use crate::types::Critique;
use serde_json::Value;

/// Parse a model reply into a [`Critique`]
///
/// Tolerates Markdown code fences, a leading `json` marker and prose around
/// the object. Missing fields decode as empty values.
pub fn parse_critique(response: &str) -> Result<Critique, ResponseParseError> {
    let value = parse_object(response)?;
    serde_json::from_value(value).map_err(|e| ResponseParseError::InvalidJson(e.to_string()))
}

/// Decode the JSON object embedded in a model reply
pub fn parse_object(response: &str) -> Result<Value, ResponseParseError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(ResponseParseError::Empty);
    }

    let body = strip_wrappers(trimmed);

    // Whole-body parse first so a bare array or string is reported as such
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return expect_object(value);
    }

    let candidate = extract_json(body).ok_or(ResponseParseError::NoJsonObject)?;
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| ResponseParseError::InvalidJson(e.to_string()))?;
    expect_object(value)
}

/// The span from the first `{` to the last `}`, if any
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn strip_wrappers(text: &str) -> &str {
    let mut body = text;

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string (```json) along with the fence line
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
        body = body.trim_end();
        body = body.strip_suffix("```").unwrap_or(body);
        body = body.trim();
    }

    match body.get(..4) {
        Some(marker) if marker.eq_ignore_ascii_case("json") => body[4..].trim_start(),
        _ => body,
    }
}

fn expect_object(value: Value) -> Result<Value, ResponseParseError> {
    let kind = match &value {
        Value::Object(_) => return Ok(value),
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    };
    Err(ResponseParseError::NotAnObject(kind))
}
