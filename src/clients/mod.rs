//! HTTP transport types for the HAL client.
//!
//! This module provides the transport layer the HAL engine sends its
//! requests through.
//!
//! # Overview
//!
//! - [`Transport`]: The capability trait every network call goes through
//! - [`HttpClient`]: The default `reqwest`-backed transport
//! - [`HttpRequest`]: A request to be sent
//! - [`HttpResponse`]: A received response
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`DataType`]: Content types for request bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::clients::{HttpClient, HttpMethod, HttpRequest, Transport};
//!
//! let client = HttpClient::new(None)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "http://localhost:8080/api/users")
//!     .build()
//!     .unwrap();
//!
//! let response = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! None. A request is sent exactly once; retry policy, if any, belongs to a
//! custom [`Transport`] implementation.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, HAL_MEDIA_TYPE, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use transport::Transport;
