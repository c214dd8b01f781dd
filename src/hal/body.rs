//! Request bodies for mutations and relation management.
//!
//! A [`RequestBody`] is an ordered set of fields. Field values can be plain
//! JSON, a [`ResourceRef`] pointing at another resource, a nested body, or a
//! list of any of those. Before sending, [`RequestBody::resolve_values`]
//! collapses every resource reference to `{"href": url}`, the form HAL
//! servers accept for associations:
//!
//! ```rust
//! use hal_client::hal::{RequestBody, ResourceRef};
//! use serde_json::json;
//!
//! let body = RequestBody::new()
//!     .with("title", "t")
//!     .with("author", ResourceRef::new("/authors/5"));
//!
//! assert_eq!(
//!     body.resolve_values(),
//!     json!({"title": "t", "author": {"href": "/authors/5"}})
//! );
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::hal::link::LinkMap;
use crate::hal::resource::{HalValue, Resource};
use crate::hal::resource_type::{classify, ResourceKind};

/// A reference to a resource by its `self` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    href: String,
}

impl ResourceRef {
    /// Creates a reference from a URL.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// Returns the referenced URL.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Returns the last path segment of the URL.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.href
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
    }

    /// Serializes to `{"href": url}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("href".to_string(), Value::String(self.href.clone()));
        Value::Object(object)
    }
}

impl From<&Resource> for ResourceRef {
    fn from(resource: &Resource) -> Self {
        resource.to_ref()
    }
}

/// Joins references into a `text/uri-list` payload.
#[must_use]
pub fn uri_list(refs: &[ResourceRef]) -> String {
    refs.iter()
        .map(ResourceRef::href)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A field value of a [`RequestBody`].
#[derive(Debug, Clone, PartialEq)]
pub enum BodyValue {
    /// Plain JSON.
    Json(Value),
    /// A reference, resolved to `{"href": url}`.
    Ref(ResourceRef),
    /// A nested body.
    Body(RequestBody),
    /// A list of values.
    List(Vec<BodyValue>),
}

impl BodyValue {
    fn resolve(&self) -> Value {
        match self {
            Self::Json(value) => resolve_json(value),
            Self::Ref(resource) => resource.to_json(),
            Self::Body(body) => body.resolve_values(),
            Self::List(items) => Value::Array(items.iter().map(Self::resolve).collect()),
        }
    }
}

impl From<Value> for BodyValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<ResourceRef> for BodyValue {
    fn from(value: ResourceRef) -> Self {
        Self::Ref(value)
    }
}

impl From<&Resource> for BodyValue {
    fn from(value: &Resource) -> Self {
        Self::Ref(value.to_ref())
    }
}

impl From<RequestBody> for BodyValue {
    fn from(value: RequestBody) -> Self {
        Self::Body(value)
    }
}

impl From<&HalValue> for BodyValue {
    fn from(value: &HalValue) -> Self {
        match value {
            HalValue::Resource(resource) => Self::Ref(resource.to_ref()),
            other => Self::Json(other.to_json()),
        }
    }
}

impl<T: Into<BodyValue>> From<Vec<T>> for BodyValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for BodyValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::String(value.to_string()))
    }
}

impl From<String> for BodyValue {
    fn from(value: String) -> Self {
        Self::Json(Value::String(value))
    }
}

macro_rules! body_value_from_json {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for BodyValue {
                fn from(value: $ty) -> Self {
                    Self::Json(Value::from(value))
                }
            }
        )*
    };
}

body_value_from_json!(bool, i32, i64, u32, u64, f64);

/// An ordered request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    fields: Vec<(String, BodyValue)>,
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field, consuming and returning `self`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<BodyValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field, replacing an existing one with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<BodyValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.fields.iter_mut().find(|(name, _)| *name == key) {
            entry.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    /// Returns a field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&BodyValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` if the body has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Produces the JSON sent on the wire.
    ///
    /// References become `{"href": url}`. JSON values shaped like a resource
    /// (a `_links` object with `self`) are collapsed the same way, using the
    /// resolved `self` URL.
    #[must_use]
    pub fn resolve_values(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.resolve()))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for RequestBody {
    fn from(object: Map<String, Value>) -> Self {
        Self {
            fields: object
                .into_iter()
                .map(|(key, value)| (key, BodyValue::Json(value)))
                .collect(),
        }
    }
}

fn resolve_json(value: &Value) -> Value {
    match value {
        Value::Object(object) if classify(value) == ResourceKind::Resource => object
            .get("_links")
            .and_then(|links| LinkMap::parse(links).ok())
            .and_then(|links| links.self_link().map(|link| link.resolved_href()))
            .map_or_else(|| value.clone(), |href| ResourceRef::new(href).to_json()),
        Value::Object(object) => Value::Object(
            object
                .iter()
                .map(|(key, value)| (key.clone(), resolve_json(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(resolve_json).collect()),
        other => other.clone(),
    }
}
