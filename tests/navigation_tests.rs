//! Integration tests for relation traversal.
//!
//! These tests follow links of built values against a local mock HAL server
//! and verify link resolution, type checking, association management and
//! page navigation.

use hal_client::hal::{
    Navigable, PageParam, PagedResourceCollection, RequestBody, RequestParams, Resource,
    ResourceError, ResourceKind, ResourceRef,
};
use hal_client::{BaseUrl, HalClient, HalConfig};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{any, body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, HalClient) {
    let server = MockServer::start().await;
    let config = HalConfig::builder()
        .base_api_url(BaseUrl::new(format!("{}/api", server.uri())).unwrap())
        .build()
        .unwrap();
    (server, HalClient::new(config).unwrap())
}

fn url(server: &MockServer, path: &str) -> String {
    format!("{}{path}", server.uri())
}

fn order_json(server: &MockServer) -> Value {
    json!({
        "number": "A-1",
        "_links": {
            "self": {"href": url(server, "/api/orders/1")},
            "owner": {"href": url(server, "/api/orders/1/owner{?projection}"), "templated": true},
            "items": {"href": url(server, "/api/orders/1/items{?page,size,sort}"), "templated": true},
            "tags": {"href": url(server, "/api/orders/1/tags")},
            "mirrors": [
                {"href": url(server, "/api/mirrors/a")},
                {"href": url(server, "/api/mirrors/b")}
            ]
        }
    })
}

fn order(server: &MockServer) -> Resource {
    hal_client::hal::factory::build(&order_json(server), false)
        .unwrap()
        .expect_resource("fixture")
        .unwrap()
}

fn user_json(server: &MockServer, id: u32) -> Value {
    json!({"name": format!("user-{id}"), "_links": {"self": {"href": url(server, &format!("/api/users/{id}"))}}})
}

// ============================================================================
// Following relations
// ============================================================================

#[tokio::test]
async fn test_get_relation_strips_template_and_fetches() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/1/owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&server, 7)))
        .expect(1)
        .mount(&server)
        .await;

    let owner = assert_ok!(order(&server).get_relation(&client, "owner", None).await);

    assert_eq!(owner.value("name"), Some(&json!("user-7")));
}

#[tokio::test]
async fn test_missing_relation_fails_without_request() {
    let (server, client) = setup().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = assert_err!(order(&server).get_relation(&client, "invoice", None).await);

    assert!(matches!(error, ResourceError::RelationNotFound { relation } if relation == "invoice"));
}

#[tokio::test]
async fn test_get_relation_rejects_collection() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_embedded": {"tags": []}})))
        .mount(&server)
        .await;

    let error = assert_err!(order(&server).get_relation(&client, "tags", None).await);

    assert!(matches!(
        error,
        ResourceError::UnexpectedType {
            expected: ResourceKind::Resource,
            actual: ResourceKind::Collection,
            ..
        }
    ));
}

#[tokio::test]
async fn test_array_relation_follows_first_link() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mirrors/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_links": {"self": {"href": url(&server, "/api/mirrors/a")}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mirror = order(&server)
        .get_relation(&client, "mirrors", None)
        .await
        .unwrap();

    assert_eq!(mirror.id().as_deref(), Some("a"));
}

#[tokio::test]
async fn test_get_related_collection() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": {"tags": [
                {"label": "red", "_links": {"color": {"href": "/colors/red"}}},
                {"label": "blue", "_links": {"self": {"href": url(&server, "/api/tags/2")}}}
            ]}
        })))
        .mount(&server)
        .await;

    let tags = order(&server)
        .get_related_collection(&client, "tags", None)
        .await
        .unwrap();

    assert_eq!(tags.len(), 2);
    assert_eq!(tags.resources()[0].value("label"), Some(&json!("red")));
    assert!(tags.resources()[0].as_resource().is_none());
    assert!(tags.resources()[1].as_resource().is_some());
}

#[tokio::test]
async fn test_get_related_page_uses_default_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/1/items"))
        .and(query_param("page", "0"))
        .and(query_param("size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": {"items": []},
            "page": {"size": 20, "totalElements": 0, "totalPages": 0, "number": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = order(&server)
        .get_related_page(&client, "items", None)
        .await
        .unwrap();

    assert!(items.is_empty());
}

#[tokio::test]
async fn test_get_related_page_rejects_page_less_collection() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_embedded": {"items": []}})))
        .mount(&server)
        .await;

    let error = assert_err!(
        order(&server)
            .get_related_page(&client, "items", None)
            .await
    );

    assert!(matches!(
        error,
        ResourceError::UnexpectedType {
            expected: ResourceKind::PagedCollection,
            actual: ResourceKind::Collection,
            ..
        }
    ));
}

// ============================================================================
// Mutating relations
// ============================================================================

#[tokio::test]
async fn test_post_relation_resolves_body_and_returns_raw_response() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/orders/1/items"))
        .and(query_param("notify", "true"))
        .and(body_json(json!({"qty": 2, "product": {"href": "/products/9"}})))
        .respond_with(ResponseTemplate::new(201).insert_header("Location", "/api/items/3"))
        .expect(1)
        .mount(&server)
        .await;

    let body = RequestBody::new()
        .with("qty", 2_i32)
        .with("product", ResourceRef::new("/products/9"));
    let params = RequestParams::new().with("notify", true);
    let response = order(&server)
        .post_relation(&client, "items", &body, Some(&params))
        .await
        .unwrap();

    assert_eq!(response.code, 201);
    assert_eq!(response.location(), Some("/api/items/3"));
}

#[tokio::test]
async fn test_put_and_patch_relation() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/orders/1/tags"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/orders/1/tags"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let body = RequestBody::new().with("label", "green");
    let order = order(&server);
    assert_ok!(order.put_relation(&client, "tags", &body, None).await);
    assert_ok!(order.patch_relation(&client, "tags", &body, None).await);
}

#[tokio::test]
async fn test_add_collection_ref_sends_uri_list() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/orders/1/tags"))
        .and(header("content-type", "text/uri-list"))
        .and(body_string("/api/tags/1\n/api/tags/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let refs = [ResourceRef::new("/api/tags/1"), ResourceRef::new("/api/tags/2")];
    let response = order(&server)
        .add_collection_ref(&client, "tags", &refs)
        .await
        .unwrap();

    assert_eq!(response.code, 204);
}

#[tokio::test]
async fn test_bind_and_unbind_relation() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/orders/1/owner"))
        .and(header("content-type", "text/uri-list"))
        .and(body_string("/api/users/8"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/orders/1/owner"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let order = order(&server);
    assert_ok!(
        order
            .bind_relation(&client, "owner", &ResourceRef::new("/api/users/8"))
            .await
    );
    assert_ok!(order.unbind_relation(&client, "owner").await);
}

#[tokio::test]
async fn test_delete_relation_targets_member_id() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/orders/1/tags/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let target = ResourceRef::new(url(&server, "/api/tags/42"));
    let response = order(&server)
        .delete_relation(&client, "tags", &target)
        .await
        .unwrap();

    assert_eq!(response.code, 204);
}

// ============================================================================
// Page navigation
// ============================================================================

fn page_json(server: &MockServer, number: u64) -> Value {
    let link = |n: u64| json!({"href": url(server, &format!("/api/users?page={n}&size=2&sort=name,ASC"))});
    let mut links = serde_json::Map::new();
    links.insert("self".to_string(), link(number));
    links.insert("first".to_string(), link(0));
    links.insert("last".to_string(), link(2));
    if number > 0 {
        links.insert("prev".to_string(), link(number - 1));
    }
    if number < 2 {
        links.insert("next".to_string(), link(number + 1));
    }

    json!({
        "_embedded": {"users": [user_json(server, 1), user_json(server, 2)]},
        "_links": links,
        "page": {"size": 2, "totalElements": 6, "totalPages": 3, "number": number}
    })
}

fn first_page(server: &MockServer) -> PagedResourceCollection {
    hal_client::hal::factory::build(&page_json(server, 0), false)
        .unwrap()
        .expect_paged_collection("fixture")
        .unwrap()
}

#[tokio::test]
async fn test_next_page_follows_link() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&server, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let page = first_page(&server);
    assert!(page.has_next());
    assert!(!page.has_prev());

    let next = page.next_page(&client).await.unwrap();

    assert_eq!(next.page_number(), 1);
    assert!(next.has_prev());
}

#[tokio::test]
async fn test_prev_page_without_link_fails() {
    let (server, client) = setup().await;
    let page = first_page(&server);

    let result = page.prev_page(&client).await;

    assert!(matches!(result, Err(ResourceError::RelationNotFound { relation }) if relation == "prev"));
}

#[tokio::test]
async fn test_custom_page_replaces_page_params_and_keeps_others() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .and(query_param("sort", "name,ASC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&server, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let page = first_page(&server)
        .custom_page(&client, PageParam::new(2, 5))
        .await
        .unwrap();

    assert_eq!(page.page_number(), 2);
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_members_navigate_through_trait() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&server, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let page = first_page(&server);
    let member = &page.resources()[1];
    let user = member.get_relation(&client, "self", None).await.unwrap();

    assert_eq!(user.value("name"), Some(&json!("user-2")));
}
