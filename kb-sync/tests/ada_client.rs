use kb_sync::ada::AdaClient;
use kb_sync_core::config::AdaConfig;
use kb_sync_core::contract::{ArticleUpsert, KnowledgeDestination, SourceCreation};
use kb_sync_core::error::{RemoteSystem, SyncError};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AdaClient {
    AdaClient::new(&AdaConfig {
        api_key: "ada-key".into(),
        base_url: server.uri(),
        article_limit: 100,
    })
}

#[tokio::test]
async fn create_source_posts_id_and_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/knowledge/sources"))
        .and(header("Authorization", "Bearer ada-key"))
        .and(body_json(json!({ "id": "kb-1", "name": "Pylon (Help Center)" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "kb-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .create_source("kb-1", "Pylon (Help Center)")
        .await
        .expect("creation should succeed");
    assert_eq!(outcome, SourceCreation::Created);
}

#[tokio::test]
async fn create_source_conflict_means_already_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/knowledge/sources"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate id"))
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .create_source("kb-1", "Pylon (Help Center)")
        .await
        .expect("conflict is not an error");
    assert_eq!(outcome, SourceCreation::AlreadyExists);
}

#[tokio::test]
async fn list_articles_filters_by_source_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/knowledge/articles/"))
        .and(query_param("knowledge_source_id", "kb-1"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "a1", "name": "Reset", "content": "Click reset", "external_updated": "2024-01-01T00:00:00Z" },
                { "id": "a2", "name": "Bare" }
            ]
        })))
        .mount(&server)
        .await;

    let articles = client_for(&server)
        .list_articles("kb-1", 100)
        .await
        .expect("listing should succeed");
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].content, "Click reset");
    assert_eq!(articles[1].content, "");
    assert_eq!(articles[1].external_updated, None);
}

#[tokio::test]
async fn bulk_upsert_sends_a_json_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/knowledge/bulk/articles/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let articles = vec![ArticleUpsert {
        id: "a1".into(),
        name: "Reset".into(),
        content: "Click reset".into(),
        knowledge_source_id: "kb-1".into(),
        external_updated: "2024-01-01T00:00:00Z".into(),
    }];
    client_for(&server)
        .bulk_upsert_articles(articles)
        .await
        .expect("upsert should succeed");

    let requests = server.received_requests().await.expect("recording enabled");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("JSON body");
    assert_eq!(
        body,
        json!([{
            "id": "a1",
            "name": "Reset",
            "content": "Click reset",
            "knowledge_source_id": "kb-1",
            "external_updated": "2024-01-01T00:00:00Z"
        }])
    );
}

#[tokio::test]
async fn bulk_upsert_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/knowledge/bulk/articles/"))
        .respond_with(ResponseTemplate::new(422).set_body_string("content is required"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .bulk_upsert_articles(vec![])
        .await
        .expect_err("422 must fail");
    match err {
        SyncError::Remote {
            system,
            status,
            body,
        } => {
            assert_eq!(system, RemoteSystem::Ada);
            assert_eq!(status, 422);
            assert_eq!(body, "content is required");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn bulk_delete_repeats_the_id_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/knowledge/articles/"))
        .and(query_param("id", "a1"))
        .and(query_param("id", "a2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .bulk_delete_articles("kb-1", vec!["a1".into(), "a2".into()])
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn delete_source_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/knowledge/sources/kb-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_source("kb-1")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn delete_missing_source_is_a_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/knowledge/sources/kb-404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .delete_source("kb-404")
        .await
        .expect_err("404 must fail");
    assert!(matches!(err, SyncError::Remote { status: 404, .. }));
    assert!(!err.is_retryable());
}
