//! Request descriptors.
//!
//! An [`ApiRequest`] is built per call and consumed by the gateway. Body
//! serialization problems are captured here and reported by the gateway as a
//! failed envelope, so building a request never fails.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::config::ServiceKind;

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// JSON body, sent with `Content-Type: application/json`.
    Json(Value),
    /// Multipart body. The HTTP client sets the content type and boundary.
    Multipart(MultipartBody),
    /// Body that could not be serialized; reported when the request is sent.
    Invalid(String),
}

impl RequestBody {
    /// Serialize `body` as JSON.
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self::Json(value),
            Err(e) => Self::Invalid(format!("failed to serialize request body: {}", e)),
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// Per-call overrides for headers and query parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }
}

/// A single outbound call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub service: ServiceKind,
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(service: ServiceKind, method: Method, path: impl Into<String>) -> Self {
        Self {
            service,
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(service: ServiceKind, path: impl Into<String>) -> Self {
        Self::new(service, Method::GET, path)
    }

    pub fn post(service: ServiceKind, path: impl Into<String>) -> Self {
        Self::new(service, Method::POST, path)
    }

    pub fn put(service: ServiceKind, path: impl Into<String>) -> Self {
        Self::new(service, Method::PUT, path)
    }

    pub fn delete(service: ServiceKind, path: impl Into<String>) -> Self {
        Self::new(service, Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Append a query parameter when `value` is present.
    pub fn query_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    /// Append every field of a serializable struct as query parameters.
    ///
    /// `None` fields are skipped; nested values are sent as compact JSON.
    pub fn query_struct<Q: Serialize>(mut self, params: &Q) -> Self {
        match serde_json::to_value(params) {
            Ok(Value::Object(map)) => {
                for (k, v) in map {
                    match v {
                        Value::Null => {}
                        Value::String(s) => self.query.push((k, s)),
                        other => self.query.push((k, other.to_string())),
                    }
                }
            }
            Ok(Value::Null) => {}
            Ok(other) => {
                self.body = RequestBody::Invalid(format!(
                    "query parameters must serialize to an object, got {}",
                    other
                ));
            }
            Err(e) => {
                self.body =
                    RequestBody::Invalid(format!("failed to serialize query parameters: {}", e));
            }
        }
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        if !matches!(self.body, RequestBody::Invalid(_)) {
            self.body = RequestBody::json(body);
        }
        self
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        if !matches!(self.body, RequestBody::Invalid(_)) {
            self.body = RequestBody::Multipart(body);
        }
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        if !matches!(self.body, RequestBody::Invalid(_)) {
            self.body = body;
        }
        self
    }

    /// Merge per-call overrides.
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.headers.extend(config.headers);
        self.query.extend(config.query);
        self
    }
}

/// One multipart part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartKind {
    Text(String),
    File {
        bytes: Vec<u8>,
        file_name: String,
        mime: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub kind: PartKind,
}

/// Multipart form description.
///
/// Kept independent of the HTTP client so it can be cloned, inspected in
/// tests and converted at send time.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    parts: Vec<Part>,
    error: Option<String>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parts.push(Part {
            name: name.into(),
            kind: PartKind::Text(value.to_string()),
        });
        self
    }

    pub fn text_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            kind: PartKind::File {
                bytes,
                file_name: file_name.into(),
                mime: mime.into(),
            },
        });
        self
    }

    /// Encode a list of records as `field[i].subfield` text parts.
    ///
    /// Every scalar leaf of every item becomes its own part. Nested objects
    /// extend the name with `.key`, nested arrays with `[j]`. Null leaves are
    /// skipped.
    pub fn indexed<S: Serialize>(mut self, field: &str, items: &[S]) -> Self {
        for (i, item) in items.iter().enumerate() {
            match serde_json::to_value(item) {
                Ok(value) => flatten_into(&mut self.parts, format!("{}[{}]", field, i), value),
                Err(e) => {
                    self.error
                        .get_or_insert_with(|| format!("failed to encode {}[{}]: {}", field, i, e));
                }
            }
        }
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Value of the first text part with this name.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match &p.kind {
            PartKind::Text(v) if p.name == name => Some(v.as_str()),
            _ => None,
        })
    }

    /// Build the reqwest form. Fails on a deferred encoding error or an
    /// invalid MIME type.
    pub fn into_form(self) -> Result<reqwest::multipart::Form, String> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part.kind {
                PartKind::Text(value) => form.text(part.name, value),
                PartKind::File {
                    bytes,
                    file_name,
                    mime,
                } => {
                    let file_part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime)
                        .map_err(|e| format!("invalid mime type '{}': {}", mime, e))?;
                    form.part(part.name, file_part)
                }
            };
        }
        Ok(form)
    }
}

fn flatten_into(parts: &mut Vec<Part>, name: String, value: Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (k, v) in map {
                flatten_into(parts, format!("{}.{}", name, k), v);
            }
        }
        Value::Array(items) => {
            for (j, v) in items.into_iter().enumerate() {
                flatten_into(parts, format!("{}[{}]", name, j), v);
            }
        }
        Value::String(s) => parts.push(Part {
            name,
            kind: PartKind::Text(s),
        }),
        other => parts.push(Part {
            name,
            kind: PartKind::Text(other.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Step {
        order: u32,
        title: String,
        note: Option<String>,
    }

    #[test]
    fn test_indexed_fields() {
        let steps = vec![
            Step {
                order: 1,
                title: "Brace".to_string(),
                note: None,
            },
            Step {
                order: 2,
                title: "Lift".to_string(),
                note: Some("slow".to_string()),
            },
        ];
        let body = MultipartBody::new().indexed("steps", &steps);

        assert_eq!(body.text_value("steps[0].order"), Some("1"));
        assert_eq!(body.text_value("steps[0].title"), Some("Brace"));
        assert_eq!(body.text_value("steps[0].note"), None);
        assert_eq!(body.text_value("steps[1].note"), Some("slow"));
        assert!(body.parts().iter().all(|p| p.name != "steps"));
    }

    #[test]
    fn test_indexed_nested_arrays() {
        let items = vec![serde_json::json!({"name": "oats", "tags": ["fiber", "carb"]})];
        let body = MultipartBody::new().indexed("ingredients", &items);
        assert_eq!(body.text_value("ingredients[0].tags[1]"), Some("carb"));
    }

    #[test]
    fn test_into_form_rejects_bad_mime() {
        let body = MultipartBody::new().file("video", vec![1, 2, 3], "a.mp4", "not a mime");
        assert!(body.into_form().is_err());
    }

    #[test]
    fn test_query_struct_skips_none() {
        #[derive(Serialize)]
        struct Params {
            page_size: u32,
            search: Option<String>,
        }
        let req = ApiRequest::get(ServiceKind::Api, "/users").query_struct(&Params {
            page_size: 20,
            search: None,
        });
        assert_eq!(req.query, vec![("page_size".to_string(), "20".to_string())]);
    }

    #[test]
    fn test_invalid_body_is_sticky() {
        let req = ApiRequest::get(ServiceKind::Api, "/users")
            .query_struct(&vec![1, 2])
            .json(&serde_json::json!({"a": 1}));
        assert!(matches!(req.body, RequestBody::Invalid(_)));
    }
}
