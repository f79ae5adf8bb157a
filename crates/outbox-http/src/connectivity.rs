//! Connectivity probe
//!
//! Periodically checks a probe URL and emits a
//! [`ConnectivityEvent::Restored`] on each offline-to-online edge. Steady
//! states stay quiet: only the transition matters, since each restore signal
//! triggers one drain pass downstream.
//!
//! The probe starts out assuming *offline*, so a reachable server produces
//! one restore signal on the first successful check. A watcher started with
//! entries already queued therefore reconciles promptly instead of waiting
//! for the next real outage cycle.

use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use outbox_core::domain::newtypes::EndpointUrl;
use outbox_core::scheduler::ConnectivityEvent;

/// Upper bound for a single probe request; a probe that hangs longer than
/// this counts as offline.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Edge-detecting reachability probe
pub struct ConnectivityProbe {
    client: Client,
    probe_url: EndpointUrl,
    interval: Duration,
    events: mpsc::Sender<ConnectivityEvent>,
    shutdown: CancellationToken,
}

impl ConnectivityProbe {
    /// Creates a probe against `probe_url`, checking every `interval`
    pub fn new(
        probe_url: EndpointUrl,
        interval: Duration,
        events: mpsc::Sender<ConnectivityEvent>,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(PROBE_TIMEOUT.min(interval))
            .build()
            .context("failed to build probe HTTP client")?;
        Ok(Self {
            client,
            probe_url,
            interval,
            events,
            shutdown,
        })
    }

    /// Probe loop; runs until cancelled or the event channel closes
    pub async fn run(self) {
        info!(probe_url = %self.probe_url, interval_secs = self.interval.as_secs(), "connectivity probe starting");

        let mut online = false;
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("connectivity probe stopping");
                    return;
                }
                _ = ticker.tick() => {
                    let now_online = self.check().await;
                    if now_online && !online {
                        info!("connectivity restored");
                        if self.events.send(ConnectivityEvent::Restored).await.is_err() {
                            debug!("event channel closed; probe exiting");
                            return;
                        }
                    } else if !now_online && online {
                        info!("connectivity lost");
                    }
                    online = now_online;
                }
            }
        }
    }

    /// One reachability check: any 2xx answer counts as online
    async fn check(&self) -> bool {
        match self.client.get(self.probe_url.as_url().clone()).send().await {
            Ok(response) => {
                let online = response.status().is_success();
                debug!(status = %response.status(), online, "probe answered");
                online
            }
            Err(e) => {
                debug!(error = %e, "probe failed");
                false
            }
        }
    }
}
