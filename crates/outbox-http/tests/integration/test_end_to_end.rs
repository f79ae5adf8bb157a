//! Full-stack tests: coordinator + file store + HTTP transport
//!
//! Drives the real adapters against a wiremock sink through the whole
//! offline-first cycle: direct delivery, fallback queuing, reconciliation
//! after the sink recovers, and the probe-triggered drain loop.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use outbox_core::coordinator::{SubmitOutcome, SyncCoordinator};
use outbox_core::domain::newtypes::EndpointUrl;
use outbox_core::queue::SubmissionQueue;
use outbox_core::scheduler::DrainScheduler;
use outbox_http::{ConnectivityProbe, HttpTransport};
use outbox_store::FileQueueStore;

use crate::common::{
    mount_accepting_sink, mount_failing_sink, payload, submit_endpoint, DEAD_ENDPOINT,
    TEST_TIMEOUT,
};

struct Fixture {
    _dir: TempDir,
    queue: Arc<SubmissionQueue>,
    coordinator: Arc<SyncCoordinator>,
    queue_file: std::path::PathBuf,
}

fn fixture(endpoints: Vec<EndpointUrl>) -> Fixture {
    let dir = TempDir::new().unwrap();
    let queue_file = dir.path().join("queue.json");
    let store = Arc::new(FileQueueStore::new(&queue_file));
    let queue = Arc::new(SubmissionQueue::new(store));
    let transport = Arc::new(HttpTransport::new(TEST_TIMEOUT).unwrap());
    let coordinator = Arc::new(SyncCoordinator::new(
        transport,
        queue.clone(),
        endpoints,
        None,
    ));
    Fixture {
        _dir: dir,
        queue,
        coordinator,
        queue_file,
    }
}

#[tokio::test]
async fn test_submit_queues_while_sink_is_down_then_drain_reconciles() {
    let server = MockServer::start().await;
    mount_failing_sink(&server, 503).await;

    let fx = fixture(vec![submit_endpoint(&server)]);

    // Sink down: the submission must land durably in the queue.
    let outcome = fx.coordinator.submit(payload("held")).await.unwrap();
    let id = match outcome {
        SubmitOutcome::Queued { id } => id,
        other => panic!("expected Queued, got {other:?}"),
    };
    let pending = fx.queue.list().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, id);

    // Sink recovers.
    server.reset().await;
    mount_accepting_sink(&server).await;

    let report = fx.coordinator.drain().await;
    assert_eq!(report.attempted, 1);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.retained, 0);
    assert!(fx.queue.list().await.is_empty());

    // The drained entry was sent by payload, not by local id.
    let requests = server.received_requests().await.unwrap();
    let drained = requests.last().unwrap();
    let body: serde_json::Value = serde_json::from_slice(&drained.body).unwrap();
    assert_eq!(body["title"]["data"], "held");
    assert!(body.get("id").is_none(), "local id leaked to the wire");
}

#[tokio::test]
async fn test_second_candidate_delivers_without_durable_write() {
    let server = MockServer::start().await;
    mount_accepting_sink(&server).await;

    let fx = fixture(vec![
        EndpointUrl::parse(DEAD_ENDPOINT).unwrap(),
        submit_endpoint(&server),
    ]);

    let outcome = fx.coordinator.submit(payload("direct")).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Delivered { .. }));

    // The reachable-sink path never touches the queue file.
    assert!(!fx.queue_file.exists());
}

#[tokio::test]
async fn test_partial_drain_keeps_rejected_entry_durable() {
    let server = MockServer::start().await;
    mount_failing_sink(&server, 503).await;

    let fx = fixture(vec![submit_endpoint(&server)]);
    for title in ["e1", "e2"] {
        fx.coordinator.submit(payload(title)).await.unwrap();
    }

    // Recover the sink but have it reject the first drained entry once.
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/submit-news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "duplicate submission"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_accepting_sink(&server).await;

    let report = fx.coordinator.drain().await;
    assert_eq!(report.delivered, 1);
    assert_eq!(report.retained, 1);

    let remaining = fx.queue.list().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(
        remaining[0].payload.get("title").unwrap().as_text(),
        Some("e1")
    );
}

#[tokio::test]
async fn test_probe_triggered_drain_empties_queue() {
    let server = MockServer::start().await;
    mount_failing_sink(&server, 503).await;
    Mock::given(method("GET"))
        .and(path("/api/test"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let fx = fixture(vec![submit_endpoint(&server)]);
    for title in ["a", "b", "c"] {
        fx.coordinator.submit(payload(title)).await.unwrap();
    }
    assert_eq!(fx.queue.list().await.len(), 3);

    // Sink comes back; the probe's restore signal should drive the drain.
    server.reset().await;
    mount_accepting_sink(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/test"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel(4);
    let shutdown = CancellationToken::new();
    let probe = ConnectivityProbe::new(
        EndpointUrl::parse(&format!("{}/api/test", server.uri())).unwrap(),
        Duration::from_millis(50),
        tx,
        shutdown.clone(),
    )
    .unwrap();
    let scheduler = DrainScheduler::new(rx, fx.coordinator.clone());

    let probe_handle = tokio::spawn(probe.run());
    let scheduler_handle = tokio::spawn(scheduler.run());

    // Wait for the reconcile to happen.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if fx.queue.list().await.is_empty() {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "queue was not drained"
        );
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    shutdown.cancel();
    probe_handle.await.unwrap();
    // The probe task owned the only sender, so the scheduler exits too.
    scheduler_handle.await.unwrap();
}
