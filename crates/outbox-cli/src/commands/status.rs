//! Status command - combined remote/local submission view
//!
//! The remote side is best-effort: when the listing endpoint is down or not
//! configured, the remote count shows as zero and the local queue is still
//! reported.

use anyhow::Result;
use clap::Args;

use outbox_core::config::Config;

#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<()> {
        let (_queue, coordinator) = super::build(config)?;
        let snapshot = coordinator.status().await;

        if json {
            println!(
                "{}",
                serde_json::json!({
                    "remote": snapshot.remote,
                    "local": snapshot.local,
                    "total": snapshot.total,
                })
            );
            return Ok(());
        }

        println!(
            "remote: {}, local: {}, total: {}",
            snapshot.remote.len(),
            snapshot.local.len(),
            snapshot.total
        );
        if !snapshot.local.is_empty() {
            println!("run `outbox drain` (or `outbox watch`) to reconcile pending entries");
        }
        Ok(())
    }
}
