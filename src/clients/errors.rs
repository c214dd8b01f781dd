//! HTTP-specific error types for the HAL client.
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the API
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::clients::{HttpClient, HttpError, Transport};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Status: {}", response.code),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {}", e),
//!     Err(HttpError::Network(e)) => println!("Network error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
///
/// The message field contains the serialized `error`/`message` fields of the
/// response body when present (Spring-style error documents), or the raw body.
///
/// # Example
///
/// ```rust
/// use hal_client::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 409,
///     url: "http://localhost/api/users/1".to_string(),
///     message: r#"{"error":"Conflict"}"#.to_string(),
/// };
///
/// assert!(error.to_string().contains("409"));
/// ```
#[derive(Debug, Error)]
#[error("Request to {url} failed with status {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The URL that was requested.
    pub url: String,
    /// Serialized error message.
    pub message: String,
}

/// Error returned when an HTTP request fails validation.
///
/// Raised before a request is sent.
///
/// # Example
///
/// ```rust
/// use hal_client::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "POST".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot use POST without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The HTTP method is not one of the supported methods.
    #[error("Invalid Http method {method}.")]
    InvalidMethod {
        /// The invalid method that was provided.
        method: String,
    },

    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST, PUT or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request URL is empty.
    #[error("Cannot send a request without a URL.")]
    EmptyUrl,
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
