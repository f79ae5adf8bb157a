//! Shared test doubles for the port traits
//!
//! In-memory implementations used by the queue, coordinator, and scheduler
//! test modules. Kept out of the public API.

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::newtypes::EndpointUrl;
use crate::domain::submission::Payload;
use crate::ports::queue_store::IQueueStore;
use crate::ports::transport::{ITransport, SendOutcome};

/// In-memory queue store with switchable failure injection
pub struct MemoryQueueStore {
    blob: Mutex<Option<Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self {
            blob: Mutex::new(None),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// A store whose blob already contains `bytes`
    pub fn preloaded(bytes: &[u8]) -> Self {
        let store = Self::new();
        *store.blob.try_lock().unwrap() = Some(bytes.to_vec());
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn raw_blob(&self) -> Option<Vec<u8>> {
        self.blob.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl IQueueStore for MemoryQueueStore {
    async fn read(&self) -> anyhow::Result<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("injected read failure");
        }
        Ok(self.blob.lock().await.clone())
    }

    async fn write(&self, bytes: &[u8]) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("injected write failure (quota exceeded)");
        }
        *self.blob.lock().await = Some(bytes.to_vec());
        Ok(())
    }
}

type Responder = Box<dyn Fn(&EndpointUrl, &Payload) -> SendOutcome + Send + Sync>;

/// Scripted transport double
///
/// The responder closure decides the outcome per (endpoint, payload); every
/// attempt is recorded so tests can assert candidate order and retry order.
pub struct StubTransport {
    responder: Responder,
    /// `(endpoint, payload)` per send attempt, in call order
    pub sent: Mutex<Vec<(String, Payload)>>,
    /// What `list_remote` answers; `None` makes it fail
    pub remote_listing: Option<Vec<Value>>,
}

impl StubTransport {
    pub fn new(responder: impl Fn(&EndpointUrl, &Payload) -> SendOutcome + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            sent: Mutex::new(Vec::new()),
            remote_listing: Some(Vec::new()),
        }
    }

    /// Transport where every endpoint accepts
    pub fn always_delivered() -> Self {
        Self::new(|_, _| SendOutcome::Delivered {
            receipt: crate::ports::transport::RemoteReceipt {
                body: serde_json::json!({"success": true}),
            },
        })
    }

    /// Transport where every endpoint is down
    pub fn always_unreachable() -> Self {
        Self::new(|_, _| SendOutcome::Unreachable {
            reason: "connection refused".to_string(),
        })
    }

    pub async fn sent_endpoints(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|(e, _)| e.clone()).collect()
    }
}

#[async_trait::async_trait]
impl ITransport for StubTransport {
    async fn send(&self, endpoint: &EndpointUrl, payload: &Payload) -> SendOutcome {
        self.sent
            .lock()
            .await
            .push((endpoint.as_str().to_string(), payload.clone()));
        (self.responder)(endpoint, payload)
    }

    async fn list_remote(&self, _endpoint: &EndpointUrl) -> anyhow::Result<Vec<Value>> {
        match &self.remote_listing {
            Some(listing) => Ok(listing.clone()),
            None => anyhow::bail!("injected listing failure"),
        }
    }
}
