//! Structural classification of HAL payloads.
//!
//! A payload is classified by the hypermedia markers it carries, checked in
//! strict precedence order:
//!
//! | Order | Markers                              | Kind                             |
//! |-------|--------------------------------------|----------------------------------|
//! | 1     | `_embedded` and `page`               | [`ResourceKind::PagedCollection`] |
//! | 2     | `_embedded`, no `page`               | [`ResourceKind::Collection`]      |
//! | 3     | `_links` containing `self`           | [`ResourceKind::Resource`]        |
//! | 4     | `_links` without `self`              | [`ResourceKind::Embedded`]        |
//! | 5     | none of the above                    | [`ResourceKind::Unknown`]         |
//!
//! Collection-ness always wins: a collection carries a `self` link for
//! page navigation and must not be mistaken for a single resource.

use std::fmt;

use serde_json::Value;

use crate::hal::link::SELF_RELATION;

/// The shape a payload was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `_embedded` and `page` present.
    PagedCollection,
    /// `_embedded` present, `page` absent.
    Collection,
    /// `_links` present with a `self` relation.
    Resource,
    /// `_links` present without a `self` relation.
    Embedded,
    /// No hypermedia markers; plain data.
    Unknown,
}

impl ResourceKind {
    /// Returns a human-readable name for messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PagedCollection => "paged resource collection",
            Self::Collection => "resource collection",
            Self::Resource => "resource",
            Self::Embedded => "embedded resource",
            Self::Unknown => "plain data",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The optional hypermedia sections of a JSON object.
///
/// Parsed once from a value; classification then works on which sections
/// are present instead of probing the object repeatedly.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    /// The `_links` section.
    pub links: Option<&'a Value>,
    /// The `_embedded` section.
    pub embedded: Option<&'a Value>,
    /// The `page` section.
    pub page: Option<&'a Value>,
}

impl<'a> Envelope<'a> {
    /// Extracts the hypermedia sections, or `None` if `raw` is not an object.
    #[must_use]
    pub fn inspect(raw: &'a Value) -> Option<Self> {
        let object = raw.as_object()?;
        Some(Self {
            links: object.get("_links"),
            embedded: object.get("_embedded"),
            page: object.get("page"),
        })
    }

    /// Returns `true` if `_links` is an object with a `self` key.
    #[must_use]
    pub fn has_self_link(&self) -> bool {
        self.links
            .and_then(Value::as_object)
            .is_some_and(|links| links.contains_key(SELF_RELATION))
    }

    /// Classifies the envelope.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match (self.embedded, self.page, self.links) {
            (Some(_), Some(_), _) => ResourceKind::PagedCollection,
            (Some(_), None, _) => ResourceKind::Collection,
            (None, _, Some(_)) if self.has_self_link() => ResourceKind::Resource,
            (None, _, Some(_)) => ResourceKind::Embedded,
            (None, _, None) => ResourceKind::Unknown,
        }
    }
}

/// Classifies a raw JSON value. Never fails.
///
/// # Example
///
/// ```rust
/// use hal_client::hal::{classify, ResourceKind};
/// use serde_json::json;
///
/// let raw = json!({"_links": {"self": {"href": "/items/1"}}, "_embedded": {}, "name": "x"});
/// assert_eq!(classify(&raw), ResourceKind::Collection);
/// ```
#[must_use]
pub fn classify(raw: &Value) -> ResourceKind {
    Envelope::inspect(raw).map_or(ResourceKind::Unknown, |envelope| envelope.kind())
}

/// Returns `true` if the value classifies as a paged collection.
#[must_use]
pub fn is_paged_resource_collection(raw: &Value) -> bool {
    classify(raw) == ResourceKind::PagedCollection
}

/// Returns `true` if the value classifies as a (non-paged) collection.
#[must_use]
pub fn is_resource_collection(raw: &Value) -> bool {
    classify(raw) == ResourceKind::Collection
}

/// Returns `true` if the value classifies as a resource.
#[must_use]
pub fn is_resource(raw: &Value) -> bool {
    classify(raw) == ResourceKind::Resource
}

/// Returns `true` if the value classifies as an embedded resource.
#[must_use]
pub fn is_embedded_resource(raw: &Value) -> bool {
    classify(raw) == ResourceKind::Embedded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paged_collection_needs_embedded_and_page() {
        let raw = json!({"_embedded": {"users": []}, "page": {"size": 20, "totalElements": 0, "totalPages": 0, "number": 0}});
        assert_eq!(classify(&raw), ResourceKind::PagedCollection);
    }

    #[test]
    fn test_collection_without_page() {
        let raw = json!({"_embedded": {"users": []}, "_links": {"self": {"href": "/users"}}});
        assert_eq!(classify(&raw), ResourceKind::Collection);
    }

    #[test]
    fn test_resource_has_self_link() {
        let raw = json!({"name": "Ada", "_links": {"self": {"href": "/users/1"}}});
        assert_eq!(classify(&raw), ResourceKind::Resource);
    }

    #[test]
    fn test_embedded_lacks_self_link() {
        let raw = json!({"city": "Paris", "_links": {"country": {"href": "/countries/fr"}}});
        assert_eq!(classify(&raw), ResourceKind::Embedded);
    }

    #[test]
    fn test_embedded_with_empty_links() {
        assert_eq!(classify(&json!({"_links": {}})), ResourceKind::Embedded);
    }

    #[test]
    fn test_collection_wins_over_self_link() {
        let raw = json!({"_links": {"self": {"href": "/items/1"}}, "_embedded": {}, "name": "x"});
        assert_eq!(classify(&raw), ResourceKind::Collection);
        assert!(!is_resource(&raw));
    }

    #[test]
    fn test_page_without_embedded_is_not_a_collection() {
        let raw = json!({"page": {"size": 20}, "_links": {"self": {"href": "/users"}}});
        assert_eq!(classify(&raw), ResourceKind::Resource);
    }

    #[test]
    fn test_non_objects_are_unknown() {
        assert_eq!(classify(&json!(42)), ResourceKind::Unknown);
        assert_eq!(classify(&json!("text")), ResourceKind::Unknown);
        assert_eq!(classify(&json!(null)), ResourceKind::Unknown);
        assert_eq!(classify(&json!([{"_links": {}}])), ResourceKind::Unknown);
        assert_eq!(classify(&json!({"name": "plain"})), ResourceKind::Unknown);
    }

    #[test]
    fn test_non_object_links_classify_as_embedded() {
        assert_eq!(classify(&json!({"_links": null})), ResourceKind::Embedded);
    }

    #[test]
    fn test_exactly_one_predicate_holds() {
        let samples = [
            json!({"_embedded": {}, "page": {}}),
            json!({"_embedded": {}}),
            json!({"_links": {"self": {"href": "/a"}}}),
            json!({"_links": {"other": {"href": "/a"}}}),
            json!({"value": 1}),
            json!({"_embedded": {}, "page": {}, "_links": {"self": {"href": "/a"}}}),
        ];

        for raw in &samples {
            let holds = [
                is_paged_resource_collection(raw),
                is_resource_collection(raw),
                is_resource(raw),
                is_embedded_resource(raw),
            ];
            let count = holds.iter().filter(|h| **h).count();
            if classify(raw) == ResourceKind::Unknown {
                assert_eq!(count, 0, "{raw}");
            } else {
                assert_eq!(count, 1, "{raw}");
            }
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ResourceKind::Embedded.to_string(), "embedded resource");
    }
}
