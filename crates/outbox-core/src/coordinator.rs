//! Sync coordinator
//!
//! [`SyncCoordinator`] orchestrates delivery attempts and reconciliation
//! between the volatile remote sink and the durable local queue. It owns no
//! durable state itself: just the transport capability, a reference to the
//! [`SubmissionQueue`], and the ordered candidate endpoint list.
//!
//! ## Delivery Flow
//!
//! 1. **Submit** (push): try direct delivery; the common reachable-server
//!    case pays no durable-write cost. On failure, queue durably.
//! 2. **Drain** (reconcile): on a connectivity-restore signal, attempt
//!    delivery for every queued entry in insertion order, removing only
//!    entries confirmed delivered.
//!
//! ## Drain Coalescing
//!
//! Drains are serialized through an async mutex. [`SyncCoordinator::drain`]
//! waits its turn; [`SyncCoordinator::drain_if_idle`] gives up immediately
//! when a drain is already in flight, which is how re-entrant connectivity
//! signals are coalesced.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::errors::{
    AttemptFailure, DeliveryFailure, EndpointAttempt, SubmissionLost,
};
use crate::domain::newtypes::{EndpointUrl, EntryId};
use crate::domain::submission::{Entry, Payload};
use crate::ports::transport::{ITransport, RemoteReceipt, SendOutcome};
use crate::queue::SubmissionQueue;

// ============================================================================
// Result surface
// ============================================================================

/// What happened to a submitted payload
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The remote sink accepted the payload directly; the queue was not touched
    Delivered {
        /// What the remote sink answered
        receipt: RemoteReceipt,
    },
    /// Every candidate endpoint failed; the payload is durably queued
    Queued {
        /// Local id under which the payload waits for the next drain
        id: EntryId,
    },
}

/// Summary of a completed drain pass
#[derive(Debug, Clone)]
pub struct DrainReport {
    /// Entries present when the pass started
    pub attempted: u32,
    /// Entries confirmed delivered and removed
    pub delivered: u32,
    /// Entries still queued after the pass
    pub retained: u32,
    /// Per-entry failure summaries (non-fatal)
    pub errors: Vec<String>,
    /// Wall-clock duration of the pass in milliseconds
    pub duration_ms: u64,
}

/// Combined remote/local view for diagnostics and display
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    /// Submissions the remote sink reports holding (best-effort; empty when
    /// the listing is unavailable)
    pub remote: Vec<Value>,
    /// Entries still pending in the local queue
    pub local: Vec<Entry>,
    /// `remote.len() + local.len()`
    pub total: usize,
}

// ============================================================================
// SyncCoordinator
// ============================================================================

/// Orchestrates delivery attempts and queue reconciliation
pub struct SyncCoordinator {
    transport: Arc<dyn ITransport>,
    queue: Arc<SubmissionQueue>,
    /// Candidate endpoints in priority order; the first to accept wins
    endpoints: Vec<EndpointUrl>,
    /// Where `status` asks for the remote listing, when configured
    listing_endpoint: Option<EndpointUrl>,
    /// Serializes drain passes; `try_lock` failure means one is in flight
    drain_guard: tokio::sync::Mutex<()>,
}

impl SyncCoordinator {
    /// Creates a new coordinator with the required dependencies
    ///
    /// # Arguments
    ///
    /// * `transport` - Delivery capability, one attempt per candidate
    /// * `queue` - Durable fallback queue
    /// * `endpoints` - Ordered candidate endpoints for the delivery protocol
    /// * `listing_endpoint` - Optional remote listing source for [`status`](Self::status)
    pub fn new(
        transport: Arc<dyn ITransport>,
        queue: Arc<SubmissionQueue>,
        endpoints: Vec<EndpointUrl>,
        listing_endpoint: Option<EndpointUrl>,
    ) -> Self {
        Self {
            transport,
            queue,
            endpoints,
            listing_endpoint,
            drain_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Submits a payload: direct delivery first, durable queue as fallback
    ///
    /// # Errors
    ///
    /// [`SubmissionLost`] when delivery failed *and* the fallback append
    /// failed. The payload was neither delivered nor saved; this is never
    /// absorbed silently.
    pub async fn submit(&self, payload: Payload) -> Result<SubmitOutcome, SubmissionLost> {
        match self.deliver(&payload).await {
            Ok(receipt) => {
                info!("submission delivered directly");
                Ok(SubmitOutcome::Delivered { receipt })
            }
            Err(delivery) => {
                warn!(detail = %delivery.summary(), "delivery failed; queuing locally");
                match self.queue.append(payload).await {
                    Ok(entry) => {
                        info!(id = %entry.id, "submission queued for later delivery");
                        Ok(SubmitOutcome::Queued { id: entry.id })
                    }
                    Err(persistence) => {
                        error!(
                            error = %format!("{persistence:#}"),
                            "fallback queue write failed; submission lost"
                        );
                        Err(SubmissionLost {
                            delivery,
                            persistence,
                        })
                    }
                }
            }
        }
    }

    /// Runs one drain pass, waiting for any in-flight pass to finish first
    ///
    /// Attempts delivery for every entry present when the pass starts, in
    /// insertion order. A failing entry is left in place and the loop moves
    /// on: one stuck submission must not block reconciliation of the rest.
    /// Individual failures are reported in the [`DrainReport`], never raised.
    pub async fn drain(&self) -> DrainReport {
        let _guard = self.drain_guard.lock().await;
        self.drain_locked().await
    }

    /// Runs one drain pass unless one is already in flight
    ///
    /// Returns `None` when the guard is held, coalescing re-entrant
    /// connectivity-restore signals into the pass already running.
    pub async fn drain_if_idle(&self) -> Option<DrainReport> {
        match self.drain_guard.try_lock() {
            Ok(_guard) => Some(self.drain_locked().await),
            Err(_) => {
                debug!("drain already in flight; signal coalesced");
                None
            }
        }
    }

    /// The drain body; caller must hold `drain_guard`
    async fn drain_locked(&self) -> DrainReport {
        let started = Instant::now();
        let pending = self.queue.list().await;

        let mut report = DrainReport {
            attempted: pending.len() as u32,
            delivered: 0,
            retained: 0,
            errors: Vec::new(),
            duration_ms: 0,
        };

        if pending.is_empty() {
            debug!("queue empty; nothing to drain");
            report.duration_ms = started.elapsed().as_millis() as u64;
            return report;
        }

        info!(pending = pending.len(), "draining queued submissions");

        // Entries appended while this pass runs are not part of `pending`;
        // the next signal picks them up.
        for entry in pending {
            match self.deliver(&entry.payload).await {
                Ok(_receipt) => match self.queue.remove(entry.id).await {
                    Ok(_) => {
                        info!(id = %entry.id, "queued submission delivered");
                        report.delivered += 1;
                    }
                    Err(err) => {
                        // Delivered remotely but still queued locally; the
                        // next pass will re-send and the remove is idempotent.
                        warn!(id = %entry.id, error = %format!("{err:#}"), "delivered but not dequeued");
                        report.retained += 1;
                        report
                            .errors
                            .push(format!("entry {}: dequeue failed: {err:#}", entry.id));
                    }
                },
                Err(failure) => {
                    debug!(id = %entry.id, detail = %failure.summary(), "entry retained");
                    report.retained += 1;
                    report
                        .errors
                        .push(format!("entry {}: {}", entry.id, failure.summary()));
                }
            }
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            attempted = report.attempted,
            delivered = report.delivered,
            retained = report.retained,
            duration_ms = report.duration_ms,
            "drain pass finished"
        );
        report
    }

    /// Delivery protocol shared by submit and drain
    ///
    /// Walks the candidate endpoints in priority order; the first well-formed
    /// success wins. Rejected and unreachable candidates are recorded and
    /// skipped. Exhaustion is reported as a value, not an error bubbling out
    /// of the loop.
    async fn deliver(&self, payload: &Payload) -> Result<RemoteReceipt, DeliveryFailure> {
        let mut attempts = Vec::new();

        for endpoint in &self.endpoints {
            match self.transport.send(endpoint, payload).await {
                SendOutcome::Delivered { receipt } => {
                    debug!(endpoint = %endpoint, "endpoint accepted submission");
                    return Ok(receipt);
                }
                SendOutcome::Rejected { reason } => {
                    warn!(endpoint = %endpoint, %reason, "endpoint rejected submission; trying next");
                    attempts.push(EndpointAttempt {
                        endpoint: endpoint.clone(),
                        failure: AttemptFailure::Rejected { reason },
                    });
                }
                SendOutcome::Unreachable { reason } => {
                    warn!(endpoint = %endpoint, %reason, "endpoint unreachable; trying next");
                    attempts.push(EndpointAttempt {
                        endpoint: endpoint.clone(),
                        failure: AttemptFailure::Unreachable { reason },
                    });
                }
            }
        }

        Err(DeliveryFailure { attempts })
    }

    /// Read-only combined view of remote and local submissions
    ///
    /// The remote listing is best-effort: a failure (or no configured
    /// listing endpoint) degrades to an empty remote sequence rather than
    /// failing the whole call.
    pub async fn status(&self) -> StatusSnapshot {
        let remote = match &self.listing_endpoint {
            Some(endpoint) => match self.transport.list_remote(endpoint).await {
                Ok(listing) => listing,
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "remote listing unavailable");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let local = self.queue.list().await;
        let total = remote.len() + local.len();
        StatusSnapshot {
            remote,
            local,
            total,
        }
    }
}
