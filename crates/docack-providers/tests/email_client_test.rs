//! Contract tests for EmailClient against the email delivery service.

use docack_providers::email::OutgoingEmail;
use docack_providers::{ProviderClient, ProviderConfig, ProviderError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(email: &MockServer) -> ProviderClient {
    let mut config = ProviderConfig::local_mock(1, 2).unwrap();
    config.email_url = email.uri().parse().unwrap();
    ProviderClient::new(config).unwrap()
}

#[tokio::test]
async fn send_posts_message_with_configured_from() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer test-email-key"))
        .and(body_partial_json(serde_json::json!({
            "from": "Docack <test@docack.io>",
            "to": "dev@docack.io",
            "subject": "Your sign-in link",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "4ef0a2f6"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .email()
        .send(&OutgoingEmail {
            to: "dev@docack.io".to_string(),
            subject: "Your sign-in link".to_string(),
            html: "<p>Click to sign in</p>".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn send_failure_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"message":"invalid to address"}"#),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .email()
        .send(&OutgoingEmail {
            to: "not-an-address".to_string(),
            subject: "s".to_string(),
            html: "h".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ProviderError::Api { status, body, .. } => {
            assert_eq!(status, 422);
            assert!(body.contains("invalid to address"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
