//! HTTP response type for the HAL client.

use std::collections::HashMap;

/// An HTTP response returned by a transport.
///
/// The body is parsed as JSON when possible. An empty body is
/// [`serde_json::Value::Null`]; a non-JSON body is kept as a string value.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values), keyed by lowercase name.
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Creates a response from a raw body text, parsing it as JSON when possible.
    #[must_use]
    pub fn from_text(code: u16, headers: HashMap<String, Vec<String>>, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(text)
                .unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
        };
        Self::new(code, headers, body)
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Location` header, set by servers on resource creation.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns an error message extracted from the body.
    ///
    /// Picks the `error`, `message` and `errors` fields when the body is an
    /// object, otherwise the body itself.
    #[must_use]
    pub fn error_message(&self) -> String {
        match &self.body {
            serde_json::Value::Object(map) => {
                let mut error_body = serde_json::Map::new();
                for key in ["error", "message", "errors"] {
                    if let Some(value) = map.get(key) {
                        error_body.insert(key.to_string(), value.clone());
                    }
                }
                serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
            }
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}
