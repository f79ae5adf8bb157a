//! Watch command - probe connectivity and reconcile automatically
//!
//! Runs the connectivity probe and the drain scheduler until interrupted.
//! The probe starts out assuming offline, so a reachable sink triggers an
//! initial reconcile shortly after startup.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use outbox_core::config::Config;
use outbox_core::domain::EndpointUrl;
use outbox_core::scheduler::DrainScheduler;
use outbox_http::ConnectivityProbe;

#[derive(Debug, Args)]
pub struct WatchCommand {}

impl WatchCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let (_queue, coordinator) = super::build(config)?;

        let probe_url = EndpointUrl::parse(&config.connectivity.probe_url)?;
        let interval = Duration::from_secs(config.connectivity.probe_interval);

        let (events_tx, events_rx) = mpsc::channel(8);
        let shutdown = CancellationToken::new();

        let probe = ConnectivityProbe::new(probe_url, interval, events_tx, shutdown.clone())?;
        let scheduler = DrainScheduler::new(events_rx, coordinator);

        let probe_task = tokio::spawn(probe.run());
        let scheduler_task = tokio::spawn(scheduler.run());

        println!("watching connectivity; press Ctrl-C to stop");
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl-C")?;
        info!("interrupt received; shutting down");

        shutdown.cancel();
        probe_task.await?;
        // The probe owned the only event sender, so the scheduler drains out.
        scheduler_task.await?;
        Ok(())
    }
}
