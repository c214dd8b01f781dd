//! The HAL engine: typed values, classification, traversal.
//!
//! # Overview
//!
//! - [`classify`] and [`ResourceKind`]: structural classification of payloads
//! - [`factory::build`]: turns a payload into a [`HalValue`]
//! - [`Resource`], [`EmbeddedResource`], [`ResourceCollection`],
//!   [`PagedResourceCollection`]: the typed values
//! - [`Link`], [`LinkMap`], [`template`]: the link model and URI template resolution
//! - [`Navigable`]: relation traversal through a [`HalClient`]
//! - [`GetOption`], [`PagedGetOption`], [`RequestBody`]: request options and bodies
//! - [`ResourceCache`], [`InMemoryCache`]: response caching
//!
//! # Example
//!
//! ```rust
//! use hal_client::hal::{factory, HalValue, ResourceKind};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "_embedded": {"users": [{"name": "Ada", "_links": {"self": {"href": "/users/1"}}}]},
//!     "page": {"size": 20, "totalElements": 1, "totalPages": 1, "number": 0}
//! });
//!
//! let value = factory::build(&raw, false).unwrap();
//! assert_eq!(value.kind(), ResourceKind::PagedCollection);
//! if let HalValue::PagedCollection(page) = value {
//!     assert_eq!(page.len(), 1);
//!     assert_eq!(page.total_elements(), 1);
//! }
//! ```

mod body;
mod cache;
mod client;
mod errors;
pub mod factory;
mod link;
mod navigation;
mod options;
mod resource;
mod resource_type;
pub mod template;

pub use body::{uri_list, BodyValue, RequestBody, ResourceRef};
pub use cache::{InMemoryCache, ResourceCache};
pub use client::HalClient;
pub use errors::ResourceError;
pub use link::{Link, LinkMap, LinkRelation, SELF_RELATION};
pub use navigation::Navigable;
pub use options::{
    GetOption, PageParam, PagedGetOption, ParamValue, RequestParams, Sort, SortOrder,
    PROJECTION_PARAM,
};
pub use resource::{
    EmbeddedResource, Entity, Fields, HalValue, PageData, PagedResourceCollection, Resource,
    ResourceCollection,
};
pub use resource_type::{
    classify, is_embedded_resource, is_paged_resource_collection, is_resource,
    is_resource_collection, Envelope, ResourceKind,
};
