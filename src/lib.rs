//! # HAL Client Library
//!
//! An async Rust client for hypermedia APIs that speak HAL
//! (`application/hal+json`), such as Spring Data REST backends.
//!
//! ## Overview
//!
//! This library provides:
//! - Type-safe configuration via [`HalConfig`] and [`HalConfigBuilder`]
//! - Structural classification of HAL payloads into resources, embedded
//!   resources, collections and paged collections
//! - A factory that turns raw JSON into typed values ([`hal::HalValue`])
//! - Relation traversal with URI template resolution ([`hal::Navigable`])
//! - Resource CRUD, search and custom queries through [`HalClient`]
//! - A pluggable transport ([`Transport`]) and response cache
//!   ([`hal::ResourceCache`])
//!
//! ## Quick Start
//!
//! ```rust
//! use hal_client::{BaseUrl, HalConfig};
//!
//! let config = HalConfig::builder()
//!     .base_api_url(BaseUrl::new("http://localhost:8080/api").unwrap())
//!     .default_page_size(50)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.default_page_size(), 50);
//! ```
//!
//! ## Following Relations
//!
//! ```rust,ignore
//! use hal_client::{BaseUrl, HalClient, HalConfig};
//! use hal_client::hal::{GetOption, Navigable, RequestBody, ResourceRef, SortOrder};
//!
//! let config = HalConfig::builder()
//!     .base_api_url(BaseUrl::new("http://localhost:8080/api")?)
//!     .build()?;
//! let client = HalClient::new(config)?;
//!
//! // GET /api/users/1
//! let user = client.get_resource("users", "1", None).await?;
//!
//! // Follow the "orders" link, sorted by date
//! let options = GetOption::new().sort_by("date", SortOrder::Desc);
//! let orders = user.get_related_collection(&client, "orders", Some(&options)).await?;
//!
//! // Create a book that references an author
//! let body = RequestBody::new()
//!     .with("title", "Dune")
//!     .with("author", ResourceRef::new("http://localhost:8080/api/authors/5"));
//! client.create_resource("books", &body).await?;
//! ```
//!
//! ## Logging
//!
//! The library emits [`tracing`] events at request, response and error
//! points. It never installs a subscriber; set
//! [`HalConfigBuilder::verbose_logs`] to also log request and response bodies.
//!
//! ## Thread Safety
//!
//! All public types are `Send + Sync`. [`HalClient`] is cheap to clone and can
//! be shared across tasks.

pub mod clients;
pub mod config;
pub mod error;
pub mod hal;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, HalConfig, HalConfigBuilder, DEFAULT_PAGE_SIZE};
pub use error::ConfigError;
pub use hal::{HalClient, ResourceError};

// Re-export HTTP client types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, Transport,
};
