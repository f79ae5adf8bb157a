//! Drain scheduler - turns connectivity signals into coalesced drain passes
//!
//! The [`DrainScheduler`] sits between whatever detects connectivity (a
//! probe, a platform network monitor) and the [`SyncCoordinator`]. It
//! consumes [`ConnectivityEvent`]s from a channel and invokes one drain per
//! restore signal, relying on
//! [`drain_if_idle`](SyncCoordinator::drain_if_idle) to coalesce signals
//! that arrive while a pass is already in flight.
//!
//! ## Flow
//!
//! ```text
//! ConnectivityProbe ──→ mpsc::Receiver ──→ DrainScheduler ──→ drain_if_idle()
//! ```
//!
//! The loop terminates when the event channel is closed (sender dropped).

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::coordinator::SyncCoordinator;

/// A signal from the runtime about the transport path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// Connectivity transitioned from absent to present; the queue should
    /// be reconciled
    Restored,
}

/// Schedules drain passes from connectivity-restore events
pub struct DrainScheduler {
    events: mpsc::Receiver<ConnectivityEvent>,
    coordinator: Arc<SyncCoordinator>,
}

impl DrainScheduler {
    /// Creates a new scheduler consuming `events`
    pub fn new(events: mpsc::Receiver<ConnectivityEvent>, coordinator: Arc<SyncCoordinator>) -> Self {
        Self {
            events,
            coordinator,
        }
    }

    /// Main event loop
    ///
    /// Each `Restored` event triggers exactly one drain attempt; events
    /// arriving while a drain is in flight are coalesced (logged, dropped).
    /// Returns when the sending side of the channel is dropped.
    pub async fn run(mut self) {
        info!("drain scheduler starting");

        while let Some(event) = self.events.recv().await {
            match event {
                ConnectivityEvent::Restored => {
                    info!("connectivity restored; reconciling queue");
                    match self.coordinator.drain_if_idle().await {
                        Some(report) => debug!(
                            delivered = report.delivered,
                            retained = report.retained,
                            "scheduled drain finished"
                        ),
                        None => debug!("drain already running; signal coalesced"),
                    }
                }
            }
        }

        info!("connectivity channel closed; drain scheduler exiting");
    }
}
