//! The HAL client service.
//!
//! [`HalClient`] is the entry point for talking to a HAL API. It builds
//! resource URLs from the configured base URL, sends requests through a
//! pluggable [`Transport`], turns responses into typed values with the
//! factory and caches them.
//!
//! # URL shapes
//!
//! | Operation              | URL                               |
//! |------------------------|-----------------------------------|
//! | `get_resource`         | `{base}/{name}/{id}`              |
//! | `get_collection/page`  | `{base}/{name}`                   |
//! | `search_*`             | `{base}/{name}/search/{query}`    |
//! | `custom_query`         | `{base}/{name}{query}`            |
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::{BaseUrl, HalClient, HalConfig};
//! use hal_client::hal::{GetOption, Navigable};
//!
//! let config = HalConfig::builder()
//!     .base_api_url(BaseUrl::new("http://localhost:8080/api")?)
//!     .build()?;
//! let client = HalClient::new(config)?;
//!
//! let user = client.get_resource("users", "1", None).await?;
//! let orders = user.get_related_page(&client, "orders", None).await?;
//! println!("{} orders", orders.total_elements());
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, Transport,
};
use crate::config::HalConfig;
use crate::hal::body::RequestBody;
use crate::hal::cache::{InMemoryCache, ResourceCache};
use crate::hal::errors::ResourceError;
use crate::hal::factory;
use crate::hal::options::{get_query, paged_query, GetOption, PagedGetOption, PROJECTION_PARAM};
use crate::hal::resource::{HalValue, PagedResourceCollection, Resource, ResourceCollection};

/// Client for a HAL API.
///
/// Cloning is cheap: the transport and cache are shared.
///
/// # Thread Safety
///
/// `HalClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Clone)]
pub struct HalClient {
    config: HalConfig,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn ResourceCache>,
}

// Verify HalClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HalClient>();
};

impl fmt::Debug for HalClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HalClient")
            .field("base_api_url", &self.config.base_api_url().as_ref())
            .field("transport", &self.transport)
            .field("cache_enabled", &self.config.cache_enabled())
            .finish_non_exhaustive()
    }
}

impl HalClient {
    /// Creates a client with the bundled HTTP transport and an in-memory cache.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the HTTP client cannot be created.
    pub fn new(config: HalConfig) -> Result<Self, HttpError> {
        let transport = HttpClient::new(Some(&config))?;
        let cache = InMemoryCache::with_lifetime(config.cache_lifetime());
        Ok(Self::with_transport(
            config,
            Arc::new(transport),
            Arc::new(cache),
        ))
    }

    /// Creates a client with a custom transport and cache.
    #[must_use]
    pub fn with_transport(
        config: HalConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn ResourceCache>,
    ) -> Self {
        Self {
            config,
            transport,
            cache,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &HalConfig {
        &self.config
    }

    /// Returns the response cache.
    #[must_use]
    pub fn cache(&self) -> &dyn ResourceCache {
        self.cache.as_ref()
    }

    /// Returns `{base}/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidParams`] if `name` is blank.
    pub fn resource_url(&self, name: &str) -> Result<String, ResourceError> {
        let name = require("resource_name", name)?;
        Ok(format!(
            "{}/{}",
            self.config.base_api_url(),
            name.trim_start_matches('/')
        ))
    }

    fn search_url(&self, name: &str, query: &str) -> Result<String, ResourceError> {
        let query = require("query", query)?;
        Ok(format!("{}/search/{query}", self.resource_url(name)?))
    }

    // ---- Reads ----

    /// Fetches one resource by id.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidParams`] if `name` or `id` is blank
    /// - [`ResourceError::UnexpectedType`] if the response is not a resource
    /// - [`ResourceError::NotFound`] on 404, [`ResourceError::Http`] on other failures
    pub async fn get_resource(
        &self,
        name: &str,
        id: &str,
        options: Option<&GetOption>,
    ) -> Result<Resource, ResourceError> {
        let id = require("id", id)?;
        let url = format!("{}/{id}", self.resource_url(name)?);
        self.fetch(&url, get_query(options))
            .await?
            .expect_resource(&url)
    }

    /// Fetches a whole collection without paging.
    ///
    /// # Errors
    ///
    /// Same as [`get_resource`](Self::get_resource), with a collection expected.
    pub async fn get_collection(
        &self,
        name: &str,
        options: Option<&GetOption>,
    ) -> Result<ResourceCollection, ResourceError> {
        let url = self.resource_url(name)?;
        self.fetch(&url, get_query(options))
            .await?
            .expect_collection(&url)
    }

    /// Fetches one page of a collection.
    ///
    /// Without options, page 0 with the configured default size is requested.
    ///
    /// # Errors
    ///
    /// Same as [`get_resource`](Self::get_resource), with a paged collection expected.
    pub async fn get_page(
        &self,
        name: &str,
        options: Option<&PagedGetOption>,
    ) -> Result<PagedResourceCollection, ResourceError> {
        let url = self.resource_url(name)?;
        let query = paged_query(options, self.config.default_page_size());
        self.fetch(&url, query)
            .await?
            .expect_paged_collection(&url)
    }

    /// Runs a search query returning one resource.
    ///
    /// # Errors
    ///
    /// Same as [`get_resource`](Self::get_resource); `query` must not be blank.
    pub async fn search_resource(
        &self,
        name: &str,
        query: &str,
        options: Option<&GetOption>,
    ) -> Result<Resource, ResourceError> {
        let url = self.search_url(name, query)?;
        self.fetch(&url, get_query(options))
            .await?
            .expect_resource(&url)
    }

    /// Runs a search query returning a collection.
    ///
    /// # Errors
    ///
    /// Same as [`get_collection`](Self::get_collection); `query` must not be blank.
    pub async fn search_collection(
        &self,
        name: &str,
        query: &str,
        options: Option<&GetOption>,
    ) -> Result<ResourceCollection, ResourceError> {
        let url = self.search_url(name, query)?;
        self.fetch(&url, get_query(options))
            .await?
            .expect_collection(&url)
    }

    /// Runs a search query returning a page.
    ///
    /// # Errors
    ///
    /// Same as [`get_page`](Self::get_page); `query` must not be blank.
    pub async fn search_page(
        &self,
        name: &str,
        query: &str,
        options: Option<&PagedGetOption>,
    ) -> Result<PagedResourceCollection, ResourceError> {
        let url = self.search_url(name, query)?;
        let query = paged_query(options, self.config.default_page_size());
        self.fetch(&url, query)
            .await?
            .expect_paged_collection(&url)
    }

    /// Sends a request to `{base}/{name}{query}` and builds whatever comes back.
    ///
    /// GET responses go through the cache like every other read. For
    /// POST/PUT/PATCH the body is resolved and sent (an empty object when
    /// `body` is `None`), and the response is built without caching.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidMethod`] for any method other than GET, POST, PUT or PATCH,
    ///   before anything is sent
    /// - [`ResourceError::InvalidParams`] if `name` or `query` is blank
    /// - [`ResourceError::NotFound`] / [`ResourceError::Http`] on request failures
    pub async fn custom_query(
        &self,
        name: &str,
        method: HttpMethod,
        query: &str,
        body: Option<&RequestBody>,
        options: Option<&PagedGetOption>,
    ) -> Result<HalValue, ResourceError> {
        if !matches!(
            method,
            HttpMethod::Get | HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch
        ) {
            tracing::error!(%method, "Allowed only GET/POST/PUT/PATCH http methods");
            return Err(ResourceError::InvalidMethod {
                method: method.to_string(),
            });
        }

        let query = require("query", query)?;
        let url = format!("{}{query}", self.resource_url(name)?);
        let params = options
            .map(|options| options.to_query(self.config.default_page_size()))
            .unwrap_or_default();

        if method == HttpMethod::Get {
            return self.fetch(&url, params).await;
        }

        let body = body.map_or_else(
            || RequestBody::new().resolve_values(),
            RequestBody::resolve_values,
        );
        let response = self
            .send(method, &url, Some(body), Some(DataType::Json), params)
            .await?;
        factory::build(&response.body, false)
    }

    // ---- Writes ----

    /// Creates a resource with POST `{base}/{name}`.
    ///
    /// Returns the built response body; servers that answer with an empty
    /// body yield `HalValue::Data(Value::Null)`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidParams`] if `name` is blank, or a
    /// request error.
    pub async fn create_resource(
        &self,
        name: &str,
        body: &RequestBody,
    ) -> Result<HalValue, ResourceError> {
        let url = self.resource_url(name)?;
        let response = self
            .send(
                HttpMethod::Post,
                &url,
                Some(body.resolve_values()),
                Some(DataType::Json),
                Vec::new(),
            )
            .await?;
        factory::build(&response.body, false)
    }

    /// Replaces a resource with PUT on its `self` URL.
    ///
    /// # Errors
    ///
    /// Returns a request error.
    pub async fn update_resource(
        &self,
        resource: &Resource,
        body: &RequestBody,
    ) -> Result<HalValue, ResourceError> {
        self.mutate(HttpMethod::Put, resource, body).await
    }

    /// Partially updates a resource with PATCH on its `self` URL.
    ///
    /// # Errors
    ///
    /// Returns a request error.
    pub async fn patch_resource(
        &self,
        resource: &Resource,
        body: &RequestBody,
    ) -> Result<HalValue, ResourceError> {
        self.mutate(HttpMethod::Patch, resource, body).await
    }

    /// Deletes a resource with DELETE on its `self` URL.
    ///
    /// # Errors
    ///
    /// Returns a request error.
    pub async fn delete_resource(&self, resource: &Resource) -> Result<HttpResponse, ResourceError> {
        let url = resource.self_href();
        let response = self
            .send(HttpMethod::Delete, &url, None, None, Vec::new())
            .await?;
        self.cache.evict(&url);
        Ok(response)
    }

    async fn mutate(
        &self,
        method: HttpMethod,
        resource: &Resource,
        body: &RequestBody,
    ) -> Result<HalValue, ResourceError> {
        let url = resource.self_href();
        let response = self
            .send(
                method,
                &url,
                Some(body.resolve_values()),
                Some(DataType::Json),
                Vec::new(),
            )
            .await?;
        self.cache.evict(&url);
        factory::build(&response.body, false)
    }

    // ---- Core ----

    /// GETs `url` with `query` and builds the response.
    ///
    /// The cache is consulted first when enabled, keyed by the full URL with
    /// its query string. Resources are marked as projections when a
    /// `projection` parameter is present in `query` or in the URL itself.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::NotFound`] on 404, [`ResourceError::Http`] on other failures
    /// - Any factory error if the response is not valid HAL
    pub async fn fetch(
        &self,
        url: &str,
        query: Vec<(String, String)>,
    ) -> Result<HalValue, ResourceError> {
        let request = HttpRequest::builder(HttpMethod::Get, url)
            .query(query)
            .build()
            .map_err(HttpError::from)?;
        let cache_key = request.full_url();
        let projection = request.has_query_param(PROJECTION_PARAM) || url_has_projection(url);

        if self.config.cache_enabled() {
            if let Some(cached) = self.cache.get(&cache_key) {
                tracing::debug!(url = %cache_key, "Returning cached value");
                return Ok(cached);
            }
        }

        let response = self.dispatch(request).await?;
        let value = factory::build(&response.body, projection)?;
        tracing::debug!(url = %cache_key, kind = %value.kind(), "Built response value");

        if self.config.cache_enabled() {
            self.cache.put(&cache_key, &value);
        }
        Ok(value)
    }

    /// Sends a request and returns the raw response, failing on non-2xx.
    pub(crate) async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Value>,
        body_type: Option<DataType>,
        query: Vec<(String, String)>,
    ) -> Result<HttpResponse, ResourceError> {
        let mut builder = HttpRequest::builder(method, url).query(query);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(body_type) = body_type {
            builder = builder.body_type(body_type);
        }
        let request = builder.build().map_err(HttpError::from)?;
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, ResourceError> {
        let url = request.full_url();
        let method = request.http_method;
        tracing::debug!(%method, %url, "Sending request");

        let response = self.transport.request(request).await?;
        if !response.is_ok() {
            tracing::warn!(%method, %url, code = response.code, "Request failed");
            return Err(ResourceError::from_http_response(
                response.code,
                &url,
                response.error_message(),
            ));
        }

        tracing::debug!(%method, %url, code = response.code, "Received response");
        Ok(response)
    }
}

fn require<'a>(param: &'static str, value: &'a str) -> Result<&'a str, ResourceError> {
    if value.trim().is_empty() {
        tracing::error!(param, "Passed param is empty");
        return Err(ResourceError::InvalidParams {
            param,
            reason: "must not be empty",
        });
    }
    Ok(value)
}

fn url_has_projection(url: &str) -> bool {
    url.split_once('?').is_some_and(|(_, query)| {
        query
            .split('&')
            .any(|pair| pair.split('=').next() == Some(PROJECTION_PARAM))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingTransport {
        responses: Mutex<Vec<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingTransport {
        fn replying(body: Value) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(vec![HttpResponse::new(200, HashMap::new(), body)]),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.requests.lock().unwrap().push(request);
            let mut responses = self.responses.lock().unwrap();
            Ok(if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            })
        }
    }

    fn client(transport: Arc<RecordingTransport>) -> HalClient {
        let config = HalConfig::builder()
            .base_api_url(BaseUrl::new("http://localhost/api").unwrap())
            .build()
            .unwrap();
        HalClient::with_transport(config, transport, Arc::new(InMemoryCache::new()))
    }

    #[test]
    fn test_resource_url_joins_base_and_name() {
        let client = client(RecordingTransport::replying(Value::Null));
        assert_eq!(
            client.resource_url("users").unwrap(),
            "http://localhost/api/users"
        );
        assert_eq!(
            client.resource_url("/users").unwrap(),
            "http://localhost/api/users"
        );
    }

    #[test]
    fn test_blank_name_is_invalid() {
        let client = client(RecordingTransport::replying(Value::Null));
        assert!(matches!(
            client.resource_url("  "),
            Err(ResourceError::InvalidParams {
                param: "resource_name",
                ..
            })
        ));
    }

    #[test]
    fn test_url_has_projection() {
        assert!(url_has_projection("http://h/users?projection=short"));
        assert!(url_has_projection("http://h/users?page=1&projection=short"));
        assert!(!url_has_projection("http://h/users?projections=x"));
        assert!(!url_has_projection("http://h/users"));
    }

    #[tokio::test]
    async fn test_custom_query_rejects_delete_without_sending() {
        let transport = RecordingTransport::replying(Value::Null);
        let client = client(Arc::clone(&transport));

        let result = client
            .custom_query("users", HttpMethod::Delete, "/search/x", None, None)
            .await;

        assert!(matches!(result, Err(ResourceError::InvalidMethod { method }) if method == "DELETE"));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_search_url_shape() {
        let transport =
            RecordingTransport::replying(json!({"_links": {"self": {"href": "http://localhost/api/users/1"}}}));
        let client = client(Arc::clone(&transport));

        client
            .search_resource("users", "findByEmail", None)
            .await
            .unwrap();

        assert_eq!(
            transport.sent()[0].url,
            "http://localhost/api/users/search/findByEmail"
        );
    }

    #[tokio::test]
    async fn test_get_page_sends_default_page() {
        let transport = RecordingTransport::replying(json!({
            "_embedded": {"users": []},
            "page": {"size": 20, "totalElements": 0, "totalPages": 0, "number": 0}
        }));
        let client = client(Arc::clone(&transport));

        client.get_page("users", None).await.unwrap();

        assert_eq!(
            transport.sent()[0].full_url(),
            "http://localhost/api/users?page=0&size=20"
        );
    }

    #[tokio::test]
    async fn test_projection_query_marks_resource() {
        let transport =
            RecordingTransport::replying(json!({"_links": {"self": {"href": "http://localhost/api/users/1"}}}));
        let client = client(transport);

        let options = GetOption::new().with_projection("short");
        let user = client.get_resource("users", "1", Some(&options)).await.unwrap();

        assert!(user.is_projection());
    }

    #[tokio::test]
    async fn test_update_evicts_cached_resource() {
        let transport = RecordingTransport::replying(
            json!({"name": "a", "_links": {"self": {"href": "http://localhost/api/users/1"}}}),
        );
        let client = client(Arc::clone(&transport));

        let user = client.get_resource("users", "1", None).await.unwrap();
        assert!(client.cache().get("http://localhost/api/users/1").is_some());

        client
            .update_resource(&user, &RequestBody::new().with("name", "b"))
            .await
            .unwrap();

        assert!(client.cache().get("http://localhost/api/users/1").is_none());
        assert_eq!(transport.sent()[1].http_method, HttpMethod::Put);
        assert_eq!(transport.sent()[1].body, Some(json!({"name": "b"})));
    }
}
