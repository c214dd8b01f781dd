//! Error types for the HAL client configuration.
//!
//! This module contains error types used when building a
//! [`HalConfig`](crate::HalConfig) or its validated newtypes.
//!
//! # Example
//!
//! ```rust
//! use hal_client::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base API URL is invalid.
    #[error("Invalid base API URL '{url}'. Please provide an absolute URL with scheme (e.g., 'http://localhost:8080/api').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The default page size must be at least one.
    #[error("Invalid default page size {size}. Page size must be greater than zero.")]
    InvalidPageSize {
        /// The rejected page size.
        size: u32,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
