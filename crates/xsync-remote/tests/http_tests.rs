//! HTTP client tests against a mock server

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xsync_remote::{HttpRemoteApi, ObjectType, RemoteApi, RequestOptions};

async fn client_for(server: &MockServer) -> HttpRemoteApi {
    HttpRemoteApi::new(server.uri(), "test-token").unwrap()
}

#[tokio::test]
async fn list_sends_bearer_token_and_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/function"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 5, "name": "calc_total", "xanoscript": "function calc_total {}"}
        ])))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let items = api.list_objects(ObjectType::Function, 1, 1000).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 5);
    assert_eq!(items[0].name, "calc_total");
}

#[tokio::test]
async fn list_accepts_items_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apigroup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{"id": 3, "name": "auth", "canonical": "grp_x1"}]
        })))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let items = api.list_objects(ObjectType::ApiGroup, 1, 1000).await.unwrap();

    assert_eq!(items[0].canonical.as_deref(), Some("grp_x1"));
}

#[tokio::test]
async fn create_posts_source_and_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 42})))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let created = api
        .create_object(ObjectType::ApiEndpoint, "api login {}", RequestOptions::with_group(3))
        .await
        .unwrap();

    assert_eq!(created.id, 42);
}

#[tokio::test]
async fn update_targets_object_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/table/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    api.update_object(ObjectType::Table, 9, "table users {}", RequestOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn conflict_status_maps_to_uniqueness_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/agent/7"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "message": "agent name must be unique"
        })))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let err = api
        .update_object(ObjectType::Agent, 7, "agent a {}", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_uniqueness_conflict(), "got: {err}");
}

#[tokio::test]
async fn validation_message_mentioning_unique_maps_to_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tool"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "message": "value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let err = api
        .create_object(ObjectType::Tool, "tool t {}", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_uniqueness_conflict());
}

#[tokio::test]
async fn other_remote_errors_surface_message_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/task/1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "internal failure in task runtime"
        })))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let err = api.delete_object(ObjectType::Task, 1).await.unwrap_err();

    match err {
        xsync_remote::Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal failure in task runtime");
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn get_object_parses_single_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/function/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 5,
            "name": "calc_total",
            "xanoscript": {"status": "ok", "value": "function calc_total {}"}
        })))
        .mount(&server)
        .await;

    let api = client_for(&server).await;
    let raw = api.get_object(ObjectType::Function, 5).await.unwrap();

    assert_eq!(raw.id, 5);
    let fetched = raw.into_fetched(ObjectType::Function).unwrap();
    assert_eq!(fetched.content, "function calc_total {}");
}
