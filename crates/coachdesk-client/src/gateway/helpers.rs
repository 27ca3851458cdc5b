//! Pure helpers: payload unwrapping, message extraction, URL joining (no HTTP).

use serde_json::Value;

/// Split a successful wire payload into `(data, message)`.
///
/// The backends answer either `{data, message}` or `{data: {data, message}}`.
/// If the payload has a `data` key, its value is taken; if that value again
/// has a `data` key, the inner one wins. A payload without `data` is used
/// whole. The innermost message present is returned.
pub(crate) fn unwrap_payload(payload: Value) -> (Value, Option<String>) {
    let Value::Object(mut outer) = payload else {
        return (payload, None);
    };

    let outer_message = outer
        .get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from);
    let Some(inner) = outer.remove("data") else {
        return (Value::Object(outer), outer_message);
    };

    match inner {
        Value::Object(mut nested) if nested.contains_key("data") => {
            let nested_message = nested
                .get("message")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(String::from);
            let data = nested.remove("data").unwrap_or(Value::Null);
            (data, nested_message.or(outer_message))
        }
        other => (other, outer_message),
    }
}

/// Server-supplied failure message from an error body.
///
/// Looks at `message`, then `data.message`, then a string `error`.
pub(crate) fn server_message(body: &Value) -> Option<String> {
    message_field(body)
        .or_else(|| body.get("data").and_then(message_field))
        .or_else(|| {
            body.get("error")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(String::from)
        })
}

fn message_field(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}

/// Parse a response body as JSON. Empty bodies are `null`; bodies that are
/// not JSON are kept as a string.
pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Join a base URL and a resource path with exactly one slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_double_nested() {
        let (data, message) = unwrap_payload(json!({"data": {"data": [1, 2], "message": "OK"}}));
        assert_eq!(data, json!([1, 2]));
        assert_eq!(message.as_deref(), Some("OK"));
    }

    #[test]
    fn test_unwrap_double_nested_outer_message() {
        let (data, message) =
            unwrap_payload(json!({"data": {"data": [{"id": 1}]}, "message": "OK"}));
        assert_eq!(data, json!([{"id": 1}]));
        assert_eq!(message.as_deref(), Some("OK"));
    }

    #[test]
    fn test_unwrap_blank_nested_message_uses_outer() {
        let (data, message) =
            unwrap_payload(json!({"data": {"data": 1, "message": " "}, "message": "OK"}));
        assert_eq!(data, json!(1));
        assert_eq!(message.as_deref(), Some("OK"));

        let (_, message) = unwrap_payload(json!({"data": {"data": 1, "message": ""}}));
        assert_eq!(message, None);
    }

    #[test]
    fn test_unwrap_single_nested() {
        let (data, message) = unwrap_payload(json!({"data": {"id": 3}, "message": "found"}));
        assert_eq!(data, json!({"id": 3}));
        assert_eq!(message.as_deref(), Some("found"));
    }

    #[test]
    fn test_unwrap_flat_payload() {
        let (data, message) = unwrap_payload(json!({"id": 3, "name": "x"}));
        assert_eq!(data, json!({"id": 3, "name": "x"}));
        assert_eq!(message, None);

        let (data, _) = unwrap_payload(json!([1, 2, 3]));
        assert_eq!(data, json!([1, 2, 3]));
    }

    #[test]
    fn test_unwrap_null_data() {
        let (data, message) = unwrap_payload(json!({"data": null, "message": "deleted"}));
        assert_eq!(data, Value::Null);
        assert_eq!(message.as_deref(), Some("deleted"));
    }

    #[test]
    fn test_server_message_precedence() {
        assert_eq!(
            server_message(&json!({"message": "Email already exists", "error": "conflict"})),
            Some("Email already exists".to_string())
        );
        assert_eq!(
            server_message(&json!({"data": {"message": "nested"}})),
            Some("nested".to_string())
        );
        assert_eq!(
            server_message(&json!({"error": "bad request"})),
            Some("bad request".to_string())
        );
        assert_eq!(server_message(&json!({"message": ""})), None);
        assert_eq!(server_message(&Value::Null), None);
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_body("<html>"), json!("<html>"));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://x.test/", "/fitness/api/mealdemo"),
            "https://x.test/fitness/api/mealdemo"
        );
        assert_eq!(join_url("https://x.test", "users"), "https://x.test/users");
    }
}
