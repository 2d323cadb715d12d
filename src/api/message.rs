//! Human-readable message derivation for non-2xx responses.
//!
//! Extractors run in order; the first one producing a non-empty string wins.

use serde_json::Value;

type Extractor = fn(&Value) -> Option<String>;

const EXTRACTORS: [Extractor; 4] = [
    body_as_string,
    message_field,
    error_field,
    error_message_field,
];

/// Derive the message for a failed response from its parsed body, falling back to the status.
pub fn derive_error_message(body: &Value, status: u16) -> String {
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(body).filter(|m| !m.is_empty()))
        .unwrap_or_else(|| status_fallback(status))
}

/// Fixed message selected by HTTP status code.
pub fn status_fallback(status: u16) -> String {
    match status {
        400 => "Invalid request. Please check your input.".to_string(),
        401 => "Invalid email or password.".to_string(),
        409 => "This email is already registered.".to_string(),
        422 => "Validation error. Please check your input.".to_string(),
        500 => "Server error. Please try again later.".to_string(),
        other => format!("Request failed with status {other}"),
    }
}

fn body_as_string(body: &Value) -> Option<String> {
    body.as_str().map(str::to_string)
}

// NestJS style: { "message": "..." } or { "message": ["a", "b"] }
fn message_field(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::Array(items) => Some(
            items
                .iter()
                .map(render_scalar)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other if is_truthy(other) => Some(render_scalar(other)),
        _ => None,
    }
}

fn error_field(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if !is_truthy(error) {
        return None;
    }
    if let Some(s) = error.as_str() {
        return Some(s.to_string());
    }
    let nested = error
        .get("message")
        .filter(|m| is_truthy(m))
        .map(render_scalar);
    Some(nested.unwrap_or_else(|| "An error occurred".to_string()))
}

fn error_message_field(body: &Value) -> Option<String> {
    body.get("errorMessage")
        .filter(|m| is_truthy(m))
        .map(render_scalar)
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_body_wins_over_everything() {
        assert_eq!(derive_error_message(&json!("plain failure"), 500), "plain failure");
    }

    #[test]
    fn message_array_is_joined() {
        let body = json!({ "message": ["name is required", "email must be valid"] });
        assert_eq!(
            derive_error_message(&body, 400),
            "name is required, email must be valid"
        );
    }

    #[test]
    fn message_takes_priority_over_error() {
        let body = json!({ "message": "Email already exists", "error": "Conflict" });
        assert_eq!(derive_error_message(&body, 409), "Email already exists");
    }

    #[test]
    fn error_field_variants() {
        assert_eq!(derive_error_message(&json!({ "error": "Bad thing" }), 400), "Bad thing");
        assert_eq!(
            derive_error_message(&json!({ "error": { "message": "Nested" } }), 400),
            "Nested"
        );
        assert_eq!(
            derive_error_message(&json!({ "error": { "code": 7 } }), 400),
            "An error occurred"
        );
    }

    #[test]
    fn error_message_field_is_used_last() {
        let body = json!({ "errorMessage": "Legacy failure" });
        assert_eq!(derive_error_message(&body, 418), "Legacy failure");
    }

    #[test]
    fn empty_values_fall_through_to_status() {
        assert_eq!(derive_error_message(&json!(""), 401), "Invalid email or password.");
        assert_eq!(
            derive_error_message(&json!({ "message": [], "error": "" }), 422),
            "Validation error. Please check your input."
        );
        assert_eq!(
            derive_error_message(&json!({}), 500),
            "Server error. Please try again later."
        );
        assert_eq!(derive_error_message(&json!(null), 503), "Request failed with status 503");
        assert_eq!(
            derive_error_message(&json!({ "message": "" }), 400),
            "Invalid request. Please check your input."
        );
        assert_eq!(
            derive_error_message(&json!({ "error": null, "errorMessage": "" }), 409),
            "This email is already registered."
        );
    }
}
