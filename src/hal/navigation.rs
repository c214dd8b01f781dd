//! Relation traversal.
//!
//! Every typed value that carries links implements [`Navigable`], which
//! follows a named relation: it resolves the link (stripping URI template
//! variables), sends the request through the [`HalClient`] and builds the
//! response.
//!
//! [`Resource`] additionally manages its associations with `text/uri-list`
//! requests, and [`PagedResourceCollection`] walks between pages through its
//! `first`/`prev`/`next`/`last` links.

use crate::clients::{DataType, HttpMethod, HttpResponse};
use crate::hal::body::{uri_list, RequestBody, ResourceRef};
use crate::hal::client::HalClient;
use crate::hal::errors::ResourceError;
use crate::hal::link::{Link, LinkMap, SELF_RELATION};
use crate::hal::options::{
    get_query, paged_query, GetOption, PageParam, PagedGetOption, RequestParams,
};
use crate::hal::resource::{
    EmbeddedResource, Entity, PagedResourceCollection, Resource, ResourceCollection,
};

/// Follows relations of a value with links.
///
/// # Relation lookup
///
/// A missing relation fails with [`ResourceError::RelationNotFound`]
/// before any request is made. For array-valued relations the first link
/// is followed; use [`LinkMap::relation_strict`] to reject them instead.
///
/// # Example
///
/// ```rust,ignore
/// use hal_client::hal::{GetOption, Navigable, PagedGetOption, PageParam};
///
/// let owner = order.get_relation(&client, "owner", None).await?;
/// let items = order
///     .get_related_page(&client, "items", Some(&PagedGetOption::default().with_page(PageParam::new(1, 5))))
///     .await?;
/// ```
#[allow(async_fn_in_trait)]
pub trait Navigable {
    /// Returns the value's links.
    fn link_map(&self) -> &LinkMap;

    /// Returns the link of a relation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] if the relation is absent.
    fn get_relation_link(&self, relation: &str) -> Result<&Link, ResourceError> {
        self.link_map().relation(relation).map_err(|e| {
            tracing::error!(relation, "Relation not found in resource links");
            e
        })
    }

    /// Follows a relation to a single resource.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::RelationNotFound`] if the relation is absent
    /// - [`ResourceError::UnexpectedType`] if the target is not a resource
    /// - Request and factory errors
    async fn get_relation(
        &self,
        client: &HalClient,
        relation: &str,
        options: Option<&GetOption>,
    ) -> Result<Resource, ResourceError> {
        let url = self.get_relation_link(relation)?.resolved_href();
        client
            .fetch(&url, get_query(options))
            .await?
            .expect_resource(&url)
    }

    /// Follows a relation to a collection.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::RelationNotFound`] if the relation is absent
    /// - [`ResourceError::UnexpectedType`] if the target is not a page-less collection
    /// - Request and factory errors
    async fn get_related_collection(
        &self,
        client: &HalClient,
        relation: &str,
        options: Option<&GetOption>,
    ) -> Result<ResourceCollection, ResourceError> {
        let url = self.get_relation_link(relation)?.resolved_href();
        client
            .fetch(&url, get_query(options))
            .await?
            .expect_collection(&url)
    }

    /// Follows a relation to one page of a collection.
    ///
    /// Without options, page 0 with the configured default size is requested.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::RelationNotFound`] if the relation is absent
    /// - [`ResourceError::UnexpectedType`] if the target has no page metadata
    /// - Request and factory errors
    async fn get_related_page(
        &self,
        client: &HalClient,
        relation: &str,
        options: Option<&PagedGetOption>,
    ) -> Result<PagedResourceCollection, ResourceError> {
        let url = self.get_relation_link(relation)?.resolved_href();
        let query = paged_query(options, client.config().default_page_size());
        client
            .fetch(&url, query)
            .await?
            .expect_paged_collection(&url)
    }

    /// POSTs a body to a relation and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] if the relation is absent,
    /// or a request error.
    async fn post_relation(
        &self,
        client: &HalClient,
        relation: &str,
        body: &RequestBody,
        params: Option<&RequestParams>,
    ) -> Result<HttpResponse, ResourceError> {
        send_to_relation(self, client, HttpMethod::Post, relation, body, params).await
    }

    /// PATCHes a body to a relation and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] if the relation is absent,
    /// or a request error.
    async fn patch_relation(
        &self,
        client: &HalClient,
        relation: &str,
        body: &RequestBody,
        params: Option<&RequestParams>,
    ) -> Result<HttpResponse, ResourceError> {
        send_to_relation(self, client, HttpMethod::Patch, relation, body, params).await
    }

    /// PUTs a body to a relation and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] if the relation is absent,
    /// or a request error.
    async fn put_relation(
        &self,
        client: &HalClient,
        relation: &str,
        body: &RequestBody,
        params: Option<&RequestParams>,
    ) -> Result<HttpResponse, ResourceError> {
        send_to_relation(self, client, HttpMethod::Put, relation, body, params).await
    }
}

async fn send_to_relation<N: Navigable + ?Sized>(
    value: &N,
    client: &HalClient,
    method: HttpMethod,
    relation: &str,
    body: &RequestBody,
    params: Option<&RequestParams>,
) -> Result<HttpResponse, ResourceError> {
    let url = value.get_relation_link(relation)?.resolved_href();
    let query = params.map(RequestParams::to_query).unwrap_or_default();
    client
        .send(
            method,
            &url,
            Some(body.resolve_values()),
            Some(DataType::Json),
            query,
        )
        .await
}

impl Navigable for Resource {
    fn link_map(&self) -> &LinkMap {
        self.links()
    }
}

impl Navigable for EmbeddedResource {
    fn link_map(&self) -> &LinkMap {
        self.links()
    }
}

impl Navigable for Entity {
    fn link_map(&self) -> &LinkMap {
        self.links()
    }
}

impl Navigable for ResourceCollection {
    fn link_map(&self) -> &LinkMap {
        self.links()
    }
}

impl Navigable for PagedResourceCollection {
    fn link_map(&self) -> &LinkMap {
        self.links()
    }
}

// ---- Association management ----

impl Resource {
    /// Adds resources to a collection-valued association.
    ///
    /// Sends POST with a `text/uri-list` body, one URL per line.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidParams`] if `refs` is empty
    /// - [`ResourceError::RelationNotFound`] if the relation is absent
    /// - Request errors
    pub async fn add_collection_ref(
        &self,
        client: &HalClient,
        relation: &str,
        refs: &[ResourceRef],
    ) -> Result<HttpResponse, ResourceError> {
        if refs.is_empty() {
            return Err(ResourceError::InvalidParams {
                param: "refs",
                reason: "must not be empty",
            });
        }
        self.send_uri_list(client, HttpMethod::Post, relation, refs)
            .await
    }

    /// Binds a single-valued association to `target`, replacing the current one.
    ///
    /// Sends PUT with a `text/uri-list` body.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::RelationNotFound`] if the relation is absent
    /// - Request errors
    pub async fn bind_relation(
        &self,
        client: &HalClient,
        relation: &str,
        target: &ResourceRef,
    ) -> Result<HttpResponse, ResourceError> {
        self.send_uri_list(
            client,
            HttpMethod::Put,
            relation,
            std::slice::from_ref(target),
        )
        .await
    }

    /// Clears an association with DELETE on the relation URL.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::RelationNotFound`] if the relation is absent
    /// - Request errors
    pub async fn unbind_relation(
        &self,
        client: &HalClient,
        relation: &str,
    ) -> Result<HttpResponse, ResourceError> {
        let url = self.get_relation_link(relation)?.resolved_href();
        client
            .send(HttpMethod::Delete, &url, None, None, Vec::new())
            .await
    }

    /// Removes one member from a collection-valued association.
    ///
    /// Sends DELETE to `{relation}/{id}`, where `id` is the last path
    /// segment of `target`.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidParams`] if `target` has no id segment
    /// - [`ResourceError::RelationNotFound`] if the relation is absent
    /// - Request errors
    pub async fn delete_relation(
        &self,
        client: &HalClient,
        relation: &str,
        target: &ResourceRef,
    ) -> Result<HttpResponse, ResourceError> {
        let id = target.id().ok_or(ResourceError::InvalidParams {
            param: "target",
            reason: "reference URL has no id segment",
        })?;
        let base = self.get_relation_link(relation)?.resolved_href();
        let url = format!("{}/{id}", base.trim_end_matches('/'));
        client
            .send(HttpMethod::Delete, &url, None, None, Vec::new())
            .await
    }

    async fn send_uri_list(
        &self,
        client: &HalClient,
        method: HttpMethod,
        relation: &str,
        refs: &[ResourceRef],
    ) -> Result<HttpResponse, ResourceError> {
        let url = self.get_relation_link(relation)?.resolved_href();
        client
            .send(
                method,
                &url,
                Some(serde_json::Value::String(uri_list(refs))),
                Some(DataType::UriList),
                Vec::new(),
            )
            .await
    }
}

// ---- Page navigation ----

impl PagedResourceCollection {
    /// Returns `true` if a `first` link is present.
    #[must_use]
    pub fn has_first(&self) -> bool {
        self.links().contains("first")
    }

    /// Returns `true` if a `last` link is present.
    #[must_use]
    pub fn has_last(&self) -> bool {
        self.links().contains("last")
    }

    /// Returns `true` if a `next` link is present.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.links().contains("next")
    }

    /// Returns `true` if a `prev` link is present.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.links().contains("prev")
    }

    /// Fetches the first page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] without a `first` link,
    /// or a request, factory or type error.
    pub async fn first_page(
        &self,
        client: &HalClient,
    ) -> Result<PagedResourceCollection, ResourceError> {
        self.follow_page(client, "first").await
    }

    /// Fetches the last page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] without a `last` link,
    /// or a request, factory or type error.
    pub async fn last_page(
        &self,
        client: &HalClient,
    ) -> Result<PagedResourceCollection, ResourceError> {
        self.follow_page(client, "last").await
    }

    /// Fetches the next page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] without a `next` link,
    /// or a request, factory or type error.
    pub async fn next_page(
        &self,
        client: &HalClient,
    ) -> Result<PagedResourceCollection, ResourceError> {
        self.follow_page(client, "next").await
    }

    /// Fetches the previous page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::RelationNotFound`] without a `prev` link,
    /// or a request, factory or type error.
    pub async fn prev_page(
        &self,
        client: &HalClient,
    ) -> Result<PagedResourceCollection, ResourceError> {
        self.follow_page(client, "prev").await
    }

    /// Re-requests this collection with another page number and size.
    ///
    /// Query parameters already on the `self` URL (sort, projection, ...)
    /// are kept; `page` and `size` are replaced.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidParams`] if `page.size` is zero
    /// - [`ResourceError::RelationNotFound`] without a `self` link
    /// - Request, factory or type errors
    pub async fn custom_page(
        &self,
        client: &HalClient,
        page: PageParam,
    ) -> Result<PagedResourceCollection, ResourceError> {
        if page.size == 0 {
            return Err(ResourceError::InvalidParams {
                param: "size",
                reason: "must be greater than zero",
            });
        }

        let href = self.get_relation_link(SELF_RELATION)?.resolved_href();
        let (url, mut query) = split_query(&href);
        query.retain(|(key, _)| key != "page" && key != "size");
        query.extend(page.to_query());

        client
            .fetch(&url, query)
            .await?
            .expect_paged_collection(&url)
    }

    async fn follow_page(
        &self,
        client: &HalClient,
        relation: &str,
    ) -> Result<PagedResourceCollection, ResourceError> {
        let url = self.get_relation_link(relation)?.resolved_href();
        client
            .fetch(&url, Vec::new())
            .await?
            .expect_paged_collection(&url)
    }
}

/// Splits an href into its path and decoded query pairs.
fn split_query(href: &str) -> (String, Vec<(String, String)>) {
    let Some((path, query)) = href.split_once('?') else {
        return (href.to_string(), Vec::new());
    };

    let pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect();
    (path.to_string(), pairs)
}

fn decode(text: &str) -> String {
    urlencoding::decode(text).map_or_else(|_| text.to_string(), |decoded| decoded.into_owned())
}
