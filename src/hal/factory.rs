//! Builds typed values from raw HAL payloads.
//!
//! [`build`] classifies a payload and constructs the matching [`HalValue`].
//! Construction recurses into fields: any field value that is itself an
//! envelope becomes a typed value, and an array holding envelopes becomes
//! a [`HalValue::List`]. Collection members are built the same way: a
//! member that is neither a [`Resource`] nor an [`EmbeddedResource`] is
//! kept as [`Entity::Other`] and never fails the build.

use serde_json::{Map, Value};

use crate::hal::errors::ResourceError;
use crate::hal::link::{json_type_name, LinkMap, SELF_RELATION};
use crate::hal::resource::{
    EmbeddedResource, Entity, Fields, HalValue, PageData, PagedResourceCollection, Resource,
    ResourceCollection,
};
use crate::hal::resource_type::{classify, Envelope, ResourceKind};

const RESERVED_KEYS: [&str; 3] = ["_links", "_embedded", "page"];

/// Builds a typed value from a raw payload.
///
/// With `projection` set, every [`Resource`] built at the top level or as a
/// collection member is marked as a projection. Classification is never
/// affected by the flag.
///
/// # Errors
///
/// - [`ResourceError::MalformedLink`] if a `_links` section is malformed
/// - [`ResourceError::MalformedEmbedded`] if an `_embedded` section is not an object
/// - [`ResourceError::Deserialize`] if `page` is neither a page object nor `null`
pub fn build(raw: &Value, projection: bool) -> Result<HalValue, ResourceError> {
    let Some(envelope) = Envelope::inspect(raw) else {
        return Ok(HalValue::Data(raw.clone()));
    };

    match envelope.kind() {
        ResourceKind::PagedCollection => {
            build_paged_collection(&envelope, projection).map(HalValue::PagedCollection)
        }
        ResourceKind::Collection => {
            build_collection(&envelope, projection).map(HalValue::Collection)
        }
        ResourceKind::Resource => build_resource(raw, projection).map(HalValue::Resource),
        ResourceKind::Embedded => build_embedded(raw).map(HalValue::Embedded),
        ResourceKind::Unknown => Ok(HalValue::Data(raw.clone())),
    }
}

fn build_paged_collection(
    envelope: &Envelope<'_>,
    projection: bool,
) -> Result<PagedResourceCollection, ResourceError> {
    let collection = build_collection(envelope, projection)?;
    let page: PageData = match envelope.page {
        Some(Value::Null) | None => PageData::default(),
        Some(page) => serde_json::from_value(page.clone())?,
    };
    Ok(PagedResourceCollection::new(collection, page))
}

fn build_collection(
    envelope: &Envelope<'_>,
    projection: bool,
) -> Result<ResourceCollection, ResourceError> {
    let links = envelope
        .links
        .map(LinkMap::parse)
        .transpose()?
        .unwrap_or_default();

    let embedded = match envelope.embedded {
        Some(Value::Object(embedded)) => embedded,
        Some(other) => {
            return Err(ResourceError::MalformedEmbedded {
                relation: "_embedded".to_string(),
                reason: format!("expected an object, found {}", json_type_name(other)),
            })
        }
        None => return Ok(ResourceCollection::new(Vec::new(), Vec::new(), links)),
    };

    let mut resources = Vec::new();
    let mut groups = Vec::with_capacity(embedded.len());
    for (relation, members) in embedded {
        let before = resources.len();
        if let Value::Array(items) = members {
            for item in items {
                resources.push(build_entity(item, projection)?);
            }
        } else {
            resources.push(build_entity(members, projection)?);
        }
        groups.push((relation.clone(), resources.len() - before));
    }

    Ok(ResourceCollection::new(resources, groups, links))
}

fn build_entity(raw: &Value, projection: bool) -> Result<Entity, ResourceError> {
    Ok(match build(raw, projection)? {
        HalValue::Resource(resource) => Entity::Resource(resource),
        HalValue::Embedded(resource) => Entity::Embedded(resource),
        other => Entity::Other(Box::new(other)),
    })
}

fn build_resource(raw: &Value, projection: bool) -> Result<Resource, ResourceError> {
    let object = as_object(raw)?;
    let links = parse_links(object)?;
    let self_link = links
        .self_link()
        .cloned()
        .ok_or_else(|| ResourceError::MalformedLink {
            relation: SELF_RELATION.to_string(),
            reason: "relation holds no link".to_string(),
        })?;
    let fields = build_fields(object)?;
    Ok(Resource::new(fields, links, self_link, projection))
}

fn build_embedded(raw: &Value) -> Result<EmbeddedResource, ResourceError> {
    let object = as_object(raw)?;
    let links = parse_links(object)?;
    let fields = build_fields(object)?;
    Ok(EmbeddedResource::new(fields, links))
}

fn as_object(raw: &Value) -> Result<&Map<String, Value>, ResourceError> {
    raw.as_object().ok_or_else(|| ResourceError::MalformedEmbedded {
        relation: "_embedded".to_string(),
        reason: format!("expected an object, found {}", json_type_name(raw)),
    })
}

fn parse_links(object: &Map<String, Value>) -> Result<LinkMap, ResourceError> {
    object
        .get("_links")
        .map(LinkMap::parse)
        .transpose()
        .map(Option::unwrap_or_default)
}

fn build_fields(object: &Map<String, Value>) -> Result<Fields, ResourceError> {
    let mut entries = Vec::with_capacity(object.len());
    for (key, value) in object {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        entries.push((key.clone(), build_field(value)?));
    }
    Ok(Fields::new(entries))
}

fn build_field(value: &Value) -> Result<HalValue, ResourceError> {
    match value {
        Value::Object(_) => build(value, false),
        Value::Array(items) if items.iter().any(|item| classify(item) != ResourceKind::Unknown) => {
            items
                .iter()
                .map(build_field)
                .collect::<Result<Vec<_>, _>>()
                .map(HalValue::List)
        }
        other => Ok(HalValue::Data(other.clone())),
    }
}
