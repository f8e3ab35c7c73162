//! Endpoint tests against a mock Trellis API.

use std::time::Duration;

use serde_json::json;
use trellis_client::{API_VERSION, BlockChanges, Error, TrellisClient};
use trellis_config::Scope;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "key_test_123";

fn client_for(server: &MockServer) -> TrellisClient {
    TrellisClient::builder()
        .base_url(format!("{}/v1", server.uri()))
        .api_key(API_KEY)
        .scope(Scope::new("proj_1", "wflow_A"))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Success paths
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_transforms_scoped_to_project() {
    let server = MockServer::start().await;
    let body = json!({"data": [{"id": "transform_1", "name": "Referral"}]});

    Mock::given(method("GET"))
        .and(path("/v1/transforms"))
        .and(query_param("proj_ids", "proj_1"))
        .and(query_param("include_transform_params", "true"))
        .and(header("Authorization", API_KEY))
        .and(header("API-Version", API_VERSION))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).transforms().list().await.unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn test_transform_operations() {
    let server = MockServer::start().await;
    let body = json!({"data": {"operations": [{"column_name": "patient_name"}]}});

    Mock::given(method("GET"))
        .and(path("/v1/transforms/transform_1/operations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .transforms()
        .operations("transform_1")
        .await
        .unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn test_list_entities_scoped_to_project() {
    let server = MockServer::start().await;
    let body = json!({"data": [{"id": "ent_1", "name": "Patients", "entity_type": "custom"}]});

    Mock::given(method("GET"))
        .and(path("/v1/entities"))
        .and(query_param("project_id", "proj_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).entities().list().await.unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn test_entity_fields() {
    let server = MockServer::start().await;
    let body = json!({"data": [{"id": "field_1", "name": "dob", "type": "text"}]});

    Mock::given(method("GET"))
        .and(path("/v1/entities/ent_1/fields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).entities().fields("ent_1").await.unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn test_workflow_config_uses_scope() {
    let server = MockServer::start().await;
    let body = json!({"id": "wflow_A", "nodes": [], "edges": []});

    Mock::given(method("GET"))
        .and(path("/v1/workflows/wflow_A/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).workflows().config().await.unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn test_update_blocks_patches_scoped_workflow() {
    let server = MockServer::start().await;
    let block = json!({
        "name": "Watch for New Referrals",
        "type": "trigger",
        "position": {"x": 100, "y": 100},
        "trigger": {"event_name": "new_asset", "entity_id": "ent_1"}
    });

    Mock::given(method("PATCH"))
        .and(path("/v1/workflows/wflow_A/blocks"))
        .and(body_json(json!({
            "blocks": [block.clone()],
            "deleted_block_ids": ["wblock_old"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workflow_id": "wflow_A"})))
        .expect(1)
        .mount(&server)
        .await;

    let changes = BlockChanges::upsert(vec![block]).with_deletions(["wblock_old"]);
    let result = client_for(&server)
        .workflows()
        .update_blocks(&changes)
        .await
        .unwrap();
    assert_eq!(result["workflow_id"], "wflow_A");
}

#[tokio::test]
async fn test_update_blocks_without_deletions_omits_field() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/workflows/wflow_A/blocks"))
        .and(body_json(json!({"blocks": [{"id": "wblock_1", "name": "Renamed"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let changes = BlockChanges::upsert(vec![json!({"id": "wblock_1", "name": "Renamed"})]);
    client_for(&server)
        .workflows()
        .update_blocks(&changes)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/workflows/wflow_A/blocks"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .workflows()
        .update_blocks(&BlockChanges::upsert(vec![json!({})]))
        .await
        .unwrap();
    assert!(result.is_null());
}

// ─────────────────────────────────────────────────────────────────────────────
// Failure paths
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    for status in [401u16, 404, 500] {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/entities/ent_1/fields"))
            .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .entities()
            .fields("ent_1")
            .await
            .unwrap_err();
        match err {
            Error::Api { status: got, body } => {
                assert_eq!(got, status);
                assert_eq!(body, "nope");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_api_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/workflows/wflow_A/config"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).workflows().config().await.unwrap_err();
    assert!(err.is_server_error());
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).entities().list().await.unwrap_err();
    assert!(matches!(err, Error::Decode { status: 200, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Reserve a port, then release it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TrellisClient::builder()
        .base_url(format!("http://{}/v1", addr))
        .api_key(API_KEY)
        .scope(Scope::new("proj_1", "wflow_A"))
        .build()
        .unwrap();

    let err = client.transforms().list().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_timeout_is_transport_error_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/transforms"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = TrellisClient::builder()
        .base_url(format!("{}/v1", server.uri()))
        .api_key(API_KEY)
        .scope(Scope::new("proj_1", "wflow_A"))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = client.transforms().list().await.unwrap_err();
    assert!(err.is_timeout(), "got {err:?}");
    assert_eq!(request_count(&server).await, 1);
}
