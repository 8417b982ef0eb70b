//! Contract tests for StorageClient against the managed object storage.

use docack_providers::{ProviderClient, ProviderConfig, ProviderError};
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(backend: &MockServer) -> ProviderClient {
    let mut config = ProviderConfig::local_mock(1, 2).unwrap();
    config.backend_url = backend.uri().parse().unwrap();
    ProviderClient::new(config).unwrap()
}

#[tokio::test]
async fn put_uploads_bytes_with_secret_key_and_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/documents/1700000000000-handbook.pdf"))
        .and(header("authorization", "Bearer test-secret"))
        .and(header("content-type", "application/pdf"))
        .and(body_bytes(b"%PDF-1.7".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": "documents/1700000000000-handbook.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .storage()
        .put(
            "1700000000000-handbook.pdf",
            b"%PDF-1.7".to_vec(),
            "application/pdf",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn put_failure_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/documents/oversized.pdf"))
        .respond_with(
            ResponseTemplate::new(413).set_body_string(r#"{"message":"payload too large"}"#),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .storage()
        .put("oversized.pdf", vec![0u8; 16], "application/pdf")
        .await
        .unwrap_err();
    match err {
        ProviderError::Api { status, body, .. } => {
            assert_eq!(status, 413);
            assert!(body.contains("payload too large"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn remove_issues_delete_with_secret_key() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/documents/1700000000000-policy.pdf"))
        .and(header("authorization", "Bearer test-secret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .storage()
        .remove("1700000000000-policy.pdf")
        .await
        .unwrap();
}

#[tokio::test]
async fn remove_missing_object_is_api_error() {
    // Callers treat removal as best-effort; the client itself still reports
    // the failure so the caller can log it.
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/documents/gone.pdf"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"not found"}"#))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.storage().remove("gone.pdf").await.unwrap_err();
    match err {
        ProviderError::Api { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn public_url_points_at_mock_server() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    let url = client.storage().public_url("1700000000000-handbook.pdf");
    assert_eq!(
        url,
        format!(
            "{}/storage/v1/object/public/documents/1700000000000-handbook.pdf",
            server.uri()
        )
    );
}
