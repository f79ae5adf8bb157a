//! Outcome classification tests for HttpTransport

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use outbox_core::domain::newtypes::EndpointUrl;
use outbox_core::ports::transport::{ITransport, SendOutcome};

use crate::common::{
    mount_accepting_sink, mount_failing_sink, payload, submit_endpoint, transport, DEAD_ENDPOINT,
    TEST_TIMEOUT,
};

#[tokio::test]
async fn test_2xx_with_success_envelope_is_delivered() {
    let server = MockServer::start().await;
    mount_accepting_sink(&server).await;

    let outcome = transport().send(&submit_endpoint(&server), &payload("A")).await;

    match outcome {
        SendOutcome::Delivered { receipt } => {
            assert_eq!(receipt.body.get("success"), Some(&serde_json::json!(true)));
        }
        other => panic!("expected Delivered, got {other:?}"),
    }
}

#[tokio::test]
async fn test_2xx_with_failure_envelope_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/submit-news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "Missing required field: title"
        })))
        .mount(&server)
        .await;

    let outcome = transport().send(&submit_endpoint(&server), &payload("A")).await;

    match outcome {
        SendOutcome::Rejected { reason } => {
            assert_eq!(reason, "Missing required field: title");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_rejected_with_status_line() {
    let server = MockServer::start().await;
    mount_failing_sink(&server, 500).await;

    let outcome = transport().send(&submit_endpoint(&server), &payload("A")).await;

    match outcome {
        SendOutcome::Rejected { reason } => assert!(reason.starts_with("500")),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_closed_port_is_unreachable() {
    let endpoint = EndpointUrl::parse(DEAD_ENDPOINT).unwrap();

    let outcome = transport().send(&endpoint, &payload("A")).await;

    assert!(matches!(outcome, SendOutcome::Unreachable { .. }));
}

#[tokio::test]
async fn test_slow_endpoint_times_out_as_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/submit-news"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": true}))
                .set_delay(TEST_TIMEOUT * 4),
        )
        .mount(&server)
        .await;

    let outcome = transport().send(&submit_endpoint(&server), &payload("A")).await;

    match outcome {
        SendOutcome::Unreachable { reason } => assert_eq!(reason, "attempt timed out"),
        other => panic!("expected Unreachable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_payload_travels_as_tagged_json() {
    let server = MockServer::start().await;
    // The mock only matches when the wire shape is the tagged field encoding.
    Mock::given(method("POST"))
        .and(path("/api/submit-news"))
        .and(body_partial_json(serde_json::json!({
            "title": {"kind": "text", "data": "Breaking"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = transport()
        .send(&submit_endpoint(&server), &payload("Breaking"))
        .await;

    assert!(matches!(outcome, SendOutcome::Delivered { .. }));
}

#[tokio::test]
async fn test_2xx_without_json_body_is_delivered_with_empty_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/submit-news"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let outcome = transport().send(&submit_endpoint(&server), &payload("A")).await;

    match outcome {
        SendOutcome::Delivered { receipt } => assert!(receipt.body.is_null()),
        other => panic!("expected Delivered, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_remote_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/submissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"title": "one"},
            {"title": "two"}
        ])))
        .mount(&server)
        .await;

    let endpoint = EndpointUrl::parse(&format!("{}/api/submissions", server.uri())).unwrap();
    let listing = transport().list_remote(&endpoint).await.unwrap();
    assert_eq!(listing.len(), 2);
}

#[tokio::test]
async fn test_list_remote_accepts_submissions_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/submissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "submissions": [{"title": "one"}],
            "count": 1
        })))
        .mount(&server)
        .await;

    let endpoint = EndpointUrl::parse(&format!("{}/api/submissions", server.uri())).unwrap();
    let listing = transport().list_remote(&endpoint).await.unwrap();
    assert_eq!(listing.len(), 1);
}

#[tokio::test]
async fn test_list_remote_fails_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/submissions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let endpoint = EndpointUrl::parse(&format!("{}/api/submissions", server.uri())).unwrap();
    assert!(transport().list_remote(&endpoint).await.is_err());
}
