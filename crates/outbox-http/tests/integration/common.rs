//! Shared test helpers for the outbox-http integration tests
//!
//! Provides wiremock-based setup for the submission sink endpoints mirrored
//! from the reference backend: POST submit endpoint answering a JSON
//! `{"success": ...}` envelope, and a GET listing endpoint.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use outbox_core::domain::newtypes::EndpointUrl;
use outbox_core::domain::submission::{FieldValue, Payload};
use outbox_http::HttpTransport;

/// Per-attempt timeout used by transports under test
pub const TEST_TIMEOUT: Duration = Duration::from_millis(500);

/// An endpoint nothing listens on (discard port)
pub const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/api/submit-news";

/// A transport with the test timeout
pub fn transport() -> HttpTransport {
    HttpTransport::new(TEST_TIMEOUT).expect("failed to build transport")
}

/// One-field text payload
pub fn payload(title: &str) -> Payload {
    let mut p = Payload::new();
    p.insert("title".to_string(), FieldValue::text(title));
    p
}

/// The server's submit endpoint as a validated URL
pub fn submit_endpoint(server: &MockServer) -> EndpointUrl {
    EndpointUrl::parse(&format!("{}/api/submit-news", server.uri())).unwrap()
}

/// Mounts a POST /api/submit-news answering 200 `{"success": true}`
pub async fn mount_accepting_sink(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/submit-news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "News submitted successfully!"
        })))
        .mount(server)
        .await;
}

/// Mounts a POST /api/submit-news answering `status` with no envelope
pub async fn mount_failing_sink(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/submit-news"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
