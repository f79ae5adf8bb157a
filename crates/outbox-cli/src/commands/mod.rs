//! CLI command implementations, one module per subcommand

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use outbox_core::config::Config;
use outbox_core::coordinator::SyncCoordinator;
use outbox_core::queue::SubmissionQueue;
use outbox_http::HttpTransport;
use outbox_store::FileQueueStore;

pub mod drain;
pub mod pending;
pub mod purge;
pub mod status;
pub mod submit;
pub mod watch;

/// Wires the queue and coordinator from configuration.
///
/// Every command goes through the same construction: file store at the
/// configured queue path, HTTP transport with the configured per-attempt
/// timeout, coordinator over the configured candidate endpoints.
pub(crate) fn build(config: &Config) -> Result<(Arc<SubmissionQueue>, Arc<SyncCoordinator>)> {
    let endpoints = config.endpoints()?;
    let listing_endpoint = config.listing_endpoint()?;

    let store = Arc::new(FileQueueStore::new(config.queue_path()));
    let queue = Arc::new(SubmissionQueue::new(store));

    let transport = Arc::new(
        HttpTransport::new(Duration::from_secs(config.delivery.request_timeout))
            .context("failed to construct HTTP transport")?,
    );

    let coordinator = Arc::new(SyncCoordinator::new(
        transport,
        queue.clone(),
        endpoints,
        listing_endpoint,
    ));
    Ok((queue, coordinator))
}
