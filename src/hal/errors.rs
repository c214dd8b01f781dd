//! Error types for HAL resource operations.
//!
//! Every fallible operation of the engine, from building a typed value out
//! of a response to following a relation, fails with [`ResourceError`].
//!
//! - [`ResourceError::MalformedLink`]: a `_links` entry violates the HAL shape
//! - [`ResourceError::RelationNotFound`]: the requested relation is absent
//! - [`ResourceError::UnexpectedType`]: the response classified as a different shape
//! - [`ResourceError::InvalidMethod`]: a verb outside GET/POST/PUT/PATCH on the generic query path
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::hal::{Navigable, ResourceError};
//!
//! match user.get_relation(&client, "owner", None).await {
//!     Ok(owner) => println!("Owner: {:?}", owner.self_href()),
//!     Err(ResourceError::RelationNotFound { relation }) => println!("no '{relation}' link"),
//!     Err(ResourceError::UnexpectedType { expected, actual, .. }) => {
//!         println!("expected {expected}, got {actual}");
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::{HttpError, HttpResponseError};
use crate::hal::resource_type::ResourceKind;

/// Error type for HAL resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A `_links` entry is neither a link object nor an array of link objects.
    #[error("Malformed link for relation '{relation}': {reason}")]
    MalformedLink {
        /// The relation whose entry is malformed (`_links` for the whole object).
        relation: String,
        /// What is wrong with the entry.
        reason: String,
    },

    /// An `_embedded` section is not an object.
    #[error("Malformed embedded relation '{relation}': {reason}")]
    MalformedEmbedded {
        /// The embedded relation key (`_embedded` for the whole section).
        relation: String,
        /// What is wrong with the entry.
        reason: String,
    },

    /// The relation is not present in the resource's links.
    #[error("Relation '{relation}' not found in resource links")]
    RelationNotFound {
        /// The relation that was requested.
        relation: String,
    },

    /// A relation required to be single-valued holds several links.
    #[error("Relation '{relation}' is multi-valued ({count} links)")]
    MultiValuedRelation {
        /// The relation that was requested.
        relation: String,
        /// How many links the relation holds.
        count: usize,
    },

    /// The response does not have the shape the operation expects.
    #[error("Expected {expected} from {url} but received {actual}")]
    UnexpectedType {
        /// The kind the operation expects.
        expected: ResourceKind,
        /// The kind the response was classified as.
        actual: ResourceKind,
        /// The URL the value came from.
        url: String,
    },

    /// The HTTP method is not allowed on the generic query path.
    #[error("Allowed only GET/POST/PUT/PATCH http methods, got {method}")]
    InvalidMethod {
        /// The rejected method.
        method: String,
    },

    /// A required input parameter is empty.
    #[error("Passed param '{param}' is invalid: {reason}")]
    InvalidParams {
        /// The name of the parameter.
        param: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The server answered 404 for a resource URL.
    #[error("Resource not found at {url}")]
    NotFound {
        /// The URL that was requested.
        url: String,
    },

    /// A resource's fields could not be converted into the requested type.
    #[error("Cannot deserialize resource fields: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Maps a non-2xx response to a resource error.
    ///
    /// - 404 -> `NotFound`
    /// - Other -> `Http(HttpError::Response)`
    #[must_use]
    pub fn from_http_response(code: u16, url: &str, message: String) -> Self {
        if code == 404 {
            return Self::NotFound {
                url: url.to_string(),
            };
        }
        Self::Http(HttpError::Response(HttpResponseError {
            code,
            url: url.to_string(),
            message,
        }))
    }

    pub(crate) fn unexpected(expected: ResourceKind, actual: ResourceKind, url: &str) -> Self {
        tracing::error!(
            %expected,
            %actual,
            url,
            "You try to get wrong resource type"
        );
        Self::UnexpectedType {
            expected,
            actual,
            url: url.to_string(),
        }
    }
}
