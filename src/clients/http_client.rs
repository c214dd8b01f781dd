//! HTTP client backed by `reqwest`.
//!
//! This module provides the [`HttpClient`] type, the default
//! [`Transport`] used by [`HalClient`](crate::HalClient).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{DataType, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::Transport;
use crate::config::HalConfig;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Media type requested from HAL servers.
pub const HAL_MEDIA_TYPE: &str = "application/hal+json";

/// HTTP client sending requests with `reqwest`.
///
/// The client handles:
/// - Default headers including User-Agent and `Accept: application/hal+json`
/// - Body encoding according to [`DataType`]
/// - Response header and body parsing
///
/// Non-2xx responses are returned as `Ok`, as required by the
/// [`Transport`] contract.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Whether request and response bodies are logged.
    verbose_logs: bool,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Arguments
    ///
    /// * `config` - Optional configuration for `user_agent_prefix` and `verbose_logs`
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: Option<&HalConfig>) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .and_then(HalConfig::user_agent_prefix)
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}HAL Client Library v{SDK_VERSION} | Rust");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), HAL_MEDIA_TYPE.to_string());

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            default_headers,
            verbose_logs: config.is_some_and(HalConfig::verbose_logs),
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Encodes the body according to its declared data type.
    fn encode_body(body: &serde_json::Value, body_type: Option<DataType>) -> String {
        match (body_type, body) {
            (Some(DataType::UriList), serde_json::Value::String(text)) => text.clone(),
            _ => body.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Patch => self.client.patch(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            let encoded = Self::encode_body(body, request.body_type);
            if self.verbose_logs {
                tracing::debug!(method = %request.http_method, url = %request.url, body = %encoded, "HTTP request");
            }
            req_builder = req_builder.body(encoded);
        } else if self.verbose_logs {
            tracing::debug!(method = %request.http_method, url = %request.url, "HTTP request");
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        if self.verbose_logs {
            tracing::debug!(code, url = %request.url, body = %body_text, "HTTP response");
        }

        Ok(HttpResponse::from_text(code, res_headers, &body_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;
    use serde_json::json;

    fn config_with_prefix() -> HalConfig {
        HalConfig::builder()
            .base_api_url(BaseUrl::new("http://localhost:8080/api").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(None).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("HAL Client Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = config_with_prefix();
        let client = HttpClient::new(Some(&config)).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
    }

    #[test]
    fn test_accept_header_is_hal_json() {
        let client = HttpClient::new(None).unwrap();

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/hal+json".to_string())
        );
    }

    #[test]
    fn test_uri_list_body_is_sent_verbatim() {
        let body = json!("http://localhost/a/1\nhttp://localhost/a/2");
        assert_eq!(
            HttpClient::encode_body(&body, Some(DataType::UriList)),
            "http://localhost/a/1\nhttp://localhost/a/2"
        );
    }

    #[test]
    fn test_json_body_is_serialized() {
        let body = json!({"name": "Ada"});
        assert_eq!(
            HttpClient::encode_body(&body, Some(DataType::Json)),
            r#"{"name":"Ada"}"#
        );
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
