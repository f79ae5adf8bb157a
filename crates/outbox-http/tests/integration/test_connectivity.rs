//! Edge-detection tests for the connectivity probe

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use outbox_core::domain::newtypes::EndpointUrl;
use outbox_core::scheduler::ConnectivityEvent;
use outbox_http::ConnectivityProbe;

const PROBE_INTERVAL: Duration = Duration::from_millis(50);

fn probe_endpoint(server: &MockServer) -> EndpointUrl {
    EndpointUrl::parse(&format!("{}/api/test", server.uri())).unwrap()
}

async fn mount_probe_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/test"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_reachable_server_emits_one_restore_signal() {
    let server = MockServer::start().await;
    mount_probe_status(&server, 200).await;

    let (tx, mut rx) = mpsc::channel(4);
    let shutdown = CancellationToken::new();
    let probe =
        ConnectivityProbe::new(probe_endpoint(&server), PROBE_INTERVAL, tx, shutdown.clone())
            .unwrap();
    let handle = tokio::spawn(probe.run());

    let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("no restore signal");
    assert_eq!(event, Some(ConnectivityEvent::Restored));

    // Steady online state stays quiet.
    let extra = tokio::time::timeout(PROBE_INTERVAL * 4, rx.recv()).await;
    assert!(extra.is_err(), "unexpected second signal while online");

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_offline_server_stays_quiet_until_it_recovers() {
    let server = MockServer::start().await;
    mount_probe_status(&server, 503).await;

    let (tx, mut rx) = mpsc::channel(4);
    let shutdown = CancellationToken::new();
    let probe =
        ConnectivityProbe::new(probe_endpoint(&server), PROBE_INTERVAL, tx, shutdown.clone())
            .unwrap();
    let handle = tokio::spawn(probe.run());

    // While the sink answers 503, no signal fires.
    let nothing = tokio::time::timeout(PROBE_INTERVAL * 4, rx.recv()).await;
    assert!(nothing.is_err(), "signal fired while offline");

    // Sink recovers; the offline→online edge produces exactly one signal.
    server.reset().await;
    mount_probe_status(&server, 200).await;

    let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("no restore signal after recovery");
    assert_eq!(event, Some(ConnectivityEvent::Restored));

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_cancellation_stops_the_probe() {
    let server = MockServer::start().await;
    mount_probe_status(&server, 200).await;

    let (tx, _rx) = mpsc::channel(4);
    let shutdown = CancellationToken::new();
    let probe =
        ConnectivityProbe::new(probe_endpoint(&server), PROBE_INTERVAL, tx, shutdown.clone())
            .unwrap();
    let handle = tokio::spawn(probe.run());

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("probe did not stop on cancellation")
        .unwrap();
}
