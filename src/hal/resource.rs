//! Typed HAL values.
//!
//! The [factory](crate::hal::factory) turns every response into a
//! [`HalValue`], a sum type with one variant per classification:
//!
//! - [`Resource`]: fields + links, always with a `self` link
//! - [`EmbeddedResource`]: fields + links, no `self` link
//! - [`ResourceCollection`]: ordered entities + collection links
//! - [`PagedResourceCollection`]: a collection + [`PageData`]
//! - `List` / `Data`: field values that are arrays of typed values, or plain JSON
//!
//! Values are immutable once built. [`HalValue::to_json`] reconstructs the
//! envelope they were built from.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::hal::body::ResourceRef;
use crate::hal::errors::ResourceError;
use crate::hal::link::{Link, LinkMap};
use crate::hal::resource_type::ResourceKind;

/// A value produced by the factory.
#[derive(Debug, Clone, PartialEq)]
pub enum HalValue {
    /// A paged collection.
    PagedCollection(PagedResourceCollection),
    /// A collection without page metadata.
    Collection(ResourceCollection),
    /// A resource with a `self` link.
    Resource(Resource),
    /// A resource without a `self` link.
    Embedded(EmbeddedResource),
    /// An array field holding at least one typed value.
    List(Vec<HalValue>),
    /// Plain JSON with no hypermedia markers.
    Data(Value),
}

impl HalValue {
    /// Returns the classification of this value.
    ///
    /// `List` and `Data` are both [`ResourceKind::Unknown`].
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::PagedCollection(_) => ResourceKind::PagedCollection,
            Self::Collection(_) => ResourceKind::Collection,
            Self::Resource(_) => ResourceKind::Resource,
            Self::Embedded(_) => ResourceKind::Embedded,
            Self::List(_) | Self::Data(_) => ResourceKind::Unknown,
        }
    }

    /// Returns the resource, if this is one.
    #[must_use]
    pub const fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// Returns the embedded resource, if this is one.
    #[must_use]
    pub const fn as_embedded(&self) -> Option<&EmbeddedResource> {
        match self {
            Self::Embedded(resource) => Some(resource),
            _ => None,
        }
    }

    /// Returns the collection, if this is a non-paged collection.
    #[must_use]
    pub const fn as_collection(&self) -> Option<&ResourceCollection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Returns the paged collection, if this is one.
    #[must_use]
    pub const fn as_paged_collection(&self) -> Option<&PagedResourceCollection> {
        match self {
            Self::PagedCollection(page) => Some(page),
            _ => None,
        }
    }

    /// Returns the plain JSON, if this is plain data.
    #[must_use]
    pub const fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Converts into a resource, failing with `UnexpectedType` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedType`] naming `url` as the source.
    pub fn expect_resource(self, url: &str) -> Result<Resource, ResourceError> {
        match self {
            Self::Resource(resource) => Ok(resource),
            other => Err(ResourceError::unexpected(
                ResourceKind::Resource,
                other.kind(),
                url,
            )),
        }
    }

    /// Converts into a non-paged collection, failing with `UnexpectedType` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedType`] naming `url` as the source.
    pub fn expect_collection(self, url: &str) -> Result<ResourceCollection, ResourceError> {
        match self {
            Self::Collection(collection) => Ok(collection),
            other => Err(ResourceError::unexpected(
                ResourceKind::Collection,
                other.kind(),
                url,
            )),
        }
    }

    /// Converts into a paged collection, failing with `UnexpectedType` otherwise.
    ///
    /// A page-less collection is not coerced.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedType`] naming `url` as the source.
    pub fn expect_paged_collection(
        self,
        url: &str,
    ) -> Result<PagedResourceCollection, ResourceError> {
        match self {
            Self::PagedCollection(page) => Ok(page),
            other => Err(ResourceError::unexpected(
                ResourceKind::PagedCollection,
                other.kind(),
                url,
            )),
        }
    }

    /// Reconstructs the JSON this value was built from.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::PagedCollection(page) => page.to_json(),
            Self::Collection(collection) => collection.to_json(),
            Self::Resource(resource) => resource.to_json(),
            Self::Embedded(resource) => resource.to_json(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Data(value) => value.clone(),
        }
    }
}

/// A resource's own fields, in serialization order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, HalValue)>,
}

impl Fields {
    pub(crate) const fn new(entries: Vec<(String, HalValue)>) -> Self {
        Self { entries }
    }

    /// Returns a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HalValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Iterates fields in serialization order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HalValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the fields to a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect()
    }
}

/// A resource with its own identity (a `self` link).
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    fields: Fields,
    links: LinkMap,
    self_link: Link,
    projection: bool,
}

impl Resource {
    pub(crate) const fn new(
        fields: Fields,
        links: LinkMap,
        self_link: Link,
        projection: bool,
    ) -> Self {
        Self {
            fields,
            links,
            self_link,
            projection,
        }
    }

    /// Returns the resource's own fields.
    #[must_use]
    pub const fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&HalValue> {
        self.fields.get(name)
    }

    /// Returns a plain-data field by name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).and_then(HalValue::as_data)
    }

    pub(crate) const fn links(&self) -> &LinkMap {
        &self.links
    }

    /// Returns the `self` link.
    #[must_use]
    pub const fn self_link(&self) -> &Link {
        &self.self_link
    }

    /// Returns the `self` URL with template variables stripped.
    #[must_use]
    pub fn self_href(&self) -> String {
        self.self_link.resolved_href()
    }

    /// Returns the last path segment of the `self` URL.
    ///
    /// Spring Data REST exposes entity ids this way.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.to_ref().id().map(str::to_string)
    }

    /// Returns `true` if the resource was fetched with a projection.
    #[must_use]
    pub const fn is_projection(&self) -> bool {
        self.projection
    }

    /// Returns a reference to this resource for request bodies and params.
    #[must_use]
    pub fn to_ref(&self) -> ResourceRef {
        ResourceRef::new(self.self_href())
    }

    /// Converts the resource's fields into a typed model.
    ///
    /// Nested typed values are converted back to their JSON envelopes first.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Deserialize`] if the fields do not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ResourceError> {
        Ok(serde_json::from_value(Value::Object(self.fields.to_json()))?)
    }

    /// Reconstructs the resource envelope.
    #[must_use]
    pub fn to_json(&self) -> Value {
        envelope_json(&self.fields, &self.links)
    }
}

/// A resource without a `self` link, existing only inside its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedResource {
    fields: Fields,
    links: LinkMap,
}

impl EmbeddedResource {
    pub(crate) const fn new(fields: Fields, links: LinkMap) -> Self {
        Self { fields, links }
    }

    /// Returns the resource's own fields.
    #[must_use]
    pub const fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&HalValue> {
        self.fields.get(name)
    }

    /// Returns a plain-data field by name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).and_then(HalValue::as_data)
    }

    pub(crate) const fn links(&self) -> &LinkMap {
        &self.links
    }

    /// Converts the resource's fields into a typed model.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Deserialize`] if the fields do not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ResourceError> {
        Ok(serde_json::from_value(Value::Object(self.fields.to_json()))?)
    }

    /// Reconstructs the resource envelope.
    #[must_use]
    pub fn to_json(&self) -> Value {
        envelope_json(&self.fields, &self.links)
    }
}

/// A collection member.
///
/// Members are built like any other payload. A member with its own
/// `_embedded` section is a collection, and a member without `_links` is
/// plain data; both are kept as [`Entity::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// A member with a `self` link.
    Resource(Resource),
    /// A member without a `self` link.
    Embedded(EmbeddedResource),
    /// A member that is not an entity.
    Other(Box<HalValue>),
}

static NO_LINKS: LinkMap = LinkMap::new();

impl Entity {
    /// Returns the member's fields, if it is a resource or an embedded resource.
    #[must_use]
    pub const fn fields(&self) -> Option<&Fields> {
        match self {
            Self::Resource(resource) => Some(resource.fields()),
            Self::Embedded(resource) => Some(resource.fields()),
            Self::Other(_) => None,
        }
    }

    /// Returns a plain-data field by name.
    ///
    /// For a plain-data member this looks up a key of the JSON object.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Other(value) => value.as_data().and_then(|data| data.get(name)),
            entity => entity
                .fields()
                .and_then(|fields| fields.get(name))
                .and_then(HalValue::as_data),
        }
    }

    /// Returns the member as a resource, if it has a `self` link.
    #[must_use]
    pub const fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// Returns the built value of a member that is not an entity.
    #[must_use]
    pub fn as_other(&self) -> Option<&HalValue> {
        match self {
            Self::Other(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn links(&self) -> &LinkMap {
        match self {
            Self::Resource(resource) => resource.links(),
            Self::Embedded(resource) => resource.links(),
            Self::Other(value) => match value.as_ref() {
                HalValue::Collection(collection) => collection.links(),
                HalValue::PagedCollection(page) => page.links(),
                _ => &NO_LINKS,
            },
        }
    }

    /// Converts the member's fields into a typed model.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Deserialize`] if the fields do not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ResourceError> {
        match self {
            Self::Resource(resource) => resource.deserialize(),
            Self::Embedded(resource) => resource.deserialize(),
            Self::Other(value) => Ok(serde_json::from_value(value.to_json())?),
        }
    }

    /// Reconstructs the member envelope.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Resource(resource) => resource.to_json(),
            Self::Embedded(resource) => resource.to_json(),
            Self::Other(value) => value.to_json(),
        }
    }
}

/// An ordered collection of entities.
///
/// Members are flattened across every `_embedded` relation key: keys in
/// serialization order, then array order within a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCollection {
    resources: Vec<Entity>,
    groups: Vec<(String, usize)>,
    links: LinkMap,
}

impl ResourceCollection {
    pub(crate) const fn new(
        resources: Vec<Entity>,
        groups: Vec<(String, usize)>,
        links: LinkMap,
    ) -> Self {
        Self {
            resources,
            groups,
            links,
        }
    }

    /// Returns the members in order.
    #[must_use]
    pub fn resources(&self) -> &[Entity] {
        &self.resources
    }

    /// Takes ownership of the members.
    #[must_use]
    pub fn into_resources(self) -> Vec<Entity> {
        self.resources
    }

    /// Iterates the members in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.resources.iter()
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if the collection has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Returns the embedded relation keys the members were read from.
    pub fn embedded_relations(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(relation, _)| relation.as_str())
    }

    pub(crate) const fn links(&self) -> &LinkMap {
        &self.links
    }

    /// Converts every member into a typed model.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Deserialize`] on the first member that does not match `T`.
    pub fn deserialize_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, ResourceError> {
        self.resources.iter().map(Entity::deserialize).collect()
    }

    /// Reconstructs the collection envelope.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut embedded = Map::new();
        let mut members = self.resources.iter();
        for (relation, count) in &self.groups {
            let items = members.by_ref().take(*count).map(Entity::to_json).collect();
            embedded.insert(relation.clone(), Value::Array(items));
        }

        let mut object = Map::new();
        object.insert("_embedded".to_string(), Value::Object(embedded));
        if !self.links.is_empty() {
            object.insert("_links".to_string(), self.links.to_json());
        }
        Value::Object(object)
    }
}

impl<'a> IntoIterator for &'a ResourceCollection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

/// Page metadata of a paged collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    /// Requested page size.
    #[serde(default)]
    pub size: u64,
    /// Total number of elements across all pages.
    #[serde(default)]
    pub total_elements: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u64,
    /// Zero-based number of this page.
    #[serde(default)]
    pub number: u64,
}

/// A collection with page metadata.
///
/// Dereferences to its [`ResourceCollection`], so members and links are
/// accessed the same way as on a plain collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResourceCollection {
    collection: ResourceCollection,
    page: PageData,
}

impl PagedResourceCollection {
    pub(crate) const fn new(collection: ResourceCollection, page: PageData) -> Self {
        Self { collection, page }
    }

    /// Returns the page metadata.
    #[must_use]
    pub const fn page(&self) -> &PageData {
        &self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page.size
    }

    /// Returns the total number of elements.
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.page.total_elements
    }

    /// Returns the total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.page.total_pages
    }

    /// Returns the zero-based page number.
    #[must_use]
    pub const fn page_number(&self) -> u64 {
        self.page.number
    }

    /// Takes ownership of the underlying collection.
    #[must_use]
    pub fn into_collection(self) -> ResourceCollection {
        self.collection
    }

    /// Reconstructs the paged collection envelope.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut json = self.collection.to_json();
        if let Value::Object(object) = &mut json {
            object.insert(
                "page".to_string(),
                serde_json::to_value(self.page).unwrap_or(Value::Null),
            );
        }
        json
    }
}

impl Deref for PagedResourceCollection {
    type Target = ResourceCollection;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

fn envelope_json(fields: &Fields, links: &LinkMap) -> Value {
    let mut object = fields.to_json();
    object.insert("_links".to_string(), links.to_json());
    Value::Object(object)
}
