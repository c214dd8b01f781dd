//! Hypermedia link model.
//!
//! A HAL `_links` object maps relation names to a single link object or to
//! an array of link objects:
//!
//! ```json
//! {
//!   "self":   { "href": "http://localhost/api/users/1" },
//!   "orders": { "href": "http://localhost/api/users/1/orders{?page,size}", "templated": true },
//!   "avatar": [ { "href": "/img/1-small", "name": "small" }, { "href": "/img/1-big", "name": "big" } ]
//! }
//! ```
//!
//! [`LinkMap::parse`] turns that object into a [`LinkMap`], preserving the
//! single/array distinction and the serialization order of relations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hal::errors::ResourceError;
use crate::hal::template;

/// Relation name reserved for a resource's own URL.
pub const SELF_RELATION: &str = "self";

/// A hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL, possibly an RFC6570 template.
    pub href: String,
    /// Whether `href` is a URI template.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
    /// Secondary key for selecting among links of the same relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    /// Creates a non-templated link.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: false,
            name: None,
            title: None,
        }
    }

    /// Creates a templated link.
    #[must_use]
    pub fn templated(href: impl Into<String>) -> Self {
        Self {
            templated: true,
            ..Self::new(href)
        }
    }

    /// Returns the URL to dereference, with template variables stripped.
    #[must_use]
    pub fn resolved_href(&self) -> String {
        template::resolve(self)
    }
}

/// The value of one relation in a [`LinkMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRelation {
    /// The relation was serialized as a single link object.
    Single(Link),
    /// The relation was serialized as an array of link objects.
    Many(Vec<Link>),
}

impl LinkRelation {
    /// Returns the first link of the relation, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Link> {
        match self {
            Self::Single(link) => Some(link),
            Self::Many(links) => links.first(),
        }
    }

    /// Returns all links of the relation as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Link] {
        match self {
            Self::Single(link) => std::slice::from_ref(link),
            Self::Many(links) => links,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Single(link) => serde_json::to_value(link).unwrap_or(Value::Null),
            Self::Many(links) => serde_json::to_value(links).unwrap_or(Value::Null),
        }
    }
}

/// Relation name to link(s), in serialization order.
///
/// # Singular access on array-valued relations
///
/// [`relation`](Self::relation) returns the first link of an array-valued
/// relation. [`relation_strict`](Self::relation_strict) fails with
/// [`ResourceError::MultiValuedRelation`] instead. Every relation-follow
/// operation of [`Navigable`](crate::hal::Navigable) uses the lenient form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap {
    entries: Vec<(String, LinkRelation)>,
}

impl LinkMap {
    /// Creates an empty link map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parses a serialized `_links` object.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedLink`] if `raw` is not an object, or
    /// if a relation is neither an object with a string `href` nor an array
    /// of such objects.
    pub fn parse(raw: &Value) -> Result<Self, ResourceError> {
        let Value::Object(map) = raw else {
            return Err(ResourceError::MalformedLink {
                relation: "_links".to_string(),
                reason: format!("expected an object, found {}", json_type_name(raw)),
            });
        };

        let mut entries = Vec::with_capacity(map.len());
        for (relation, value) in map {
            let parsed = match value {
                Value::Array(items) => LinkRelation::Many(
                    items
                        .iter()
                        .map(|item| parse_link(relation, item))
                        .collect::<Result<_, _>>()?,
                ),
                other => LinkRelation::Single(parse_link(relation, other)?),
            };
            entries.push((relation.clone(), parsed));
        }

        Ok(Self { entries })
    }

    /// Adds or replaces a relation.
    pub fn insert(&mut self, relation: impl Into<String>, value: LinkRelation) {
        let relation = relation.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == relation) {
            entry.1 = value;
        } else {
            self.entries.push((relation, value));
        }
    }

    /// Returns the raw relation entry.
    #[must_use]
    pub fn get(&self, relation: &str) -> Option<&LinkRelation> {
        self.entries
            .iter()
            .find(|(name, _)| name == relation)
            .map(|(_, value)| value)
    }

    /// Returns `true` if the relation is present.
    #[must_use]
    pub fn contains(&self, relation: &str) -> bool {
        self.get(relation).is_some()
    }

    /// Returns `true` if the map holds a `self` relation.
    #[must_use]
    pub fn has_self(&self) -> bool {
        self.contains(SELF_RELATION)
    }

    /// Returns the link for a relation, taking the first of an array.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] if the relation is absent
    /// or is an empty array.
    pub fn relation(&self, relation: &str) -> Result<&Link, ResourceError> {
        self.get(relation)
            .and_then(LinkRelation::first)
            .ok_or_else(|| ResourceError::RelationNotFound {
                relation: relation.to_string(),
            })
    }

    /// Returns the link for a relation that must be single-valued.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] if the relation is absent,
    /// or [`ResourceError::MultiValuedRelation`] if it holds more than one link.
    pub fn relation_strict(&self, relation: &str) -> Result<&Link, ResourceError> {
        match self.get(relation) {
            Some(LinkRelation::Many(links)) if links.len() > 1 => {
                Err(ResourceError::MultiValuedRelation {
                    relation: relation.to_string(),
                    count: links.len(),
                })
            }
            _ => self.relation(relation),
        }
    }

    /// Returns every link of a relation; empty if absent.
    #[must_use]
    pub fn relation_links(&self, relation: &str) -> &[Link] {
        self.get(relation).map_or(&[][..], LinkRelation::as_slice)
    }

    /// Returns the `self` link, if present.
    #[must_use]
    pub fn self_link(&self) -> Option<&Link> {
        self.get(SELF_RELATION).and_then(LinkRelation::first)
    }

    /// Iterates relations in serialization order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LinkRelation)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of relations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no relations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the map back to a `_links` object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

fn parse_link(relation: &str, raw: &Value) -> Result<Link, ResourceError> {
    let Value::Object(object) = raw else {
        return Err(ResourceError::MalformedLink {
            relation: relation.to_string(),
            reason: format!("expected a link object, found {}", json_type_name(raw)),
        });
    };
    if !object.get("href").is_some_and(Value::is_string) {
        return Err(ResourceError::MalformedLink {
            relation: relation.to_string(),
            reason: "link has no string 'href'".to_string(),
        });
    }

    serde_json::from_value(raw.clone()).map_err(|e| ResourceError::MalformedLink {
        relation: relation.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
