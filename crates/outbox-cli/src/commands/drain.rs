//! Drain command - run one reconciliation pass over the pending queue

use anyhow::Result;
use clap::Args;

use outbox_core::config::Config;

#[derive(Debug, Args)]
pub struct DrainCommand {}

impl DrainCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<()> {
        let (_queue, coordinator) = super::build(config)?;
        let report = coordinator.drain().await;

        if json {
            println!(
                "{}",
                serde_json::json!({
                    "attempted": report.attempted,
                    "delivered": report.delivered,
                    "retained": report.retained,
                    "errors": report.errors,
                    "duration_ms": report.duration_ms,
                })
            );
            return Ok(());
        }

        if report.attempted == 0 {
            println!("queue is empty");
            return Ok(());
        }

        println!(
            "attempted {}, delivered {}, retained {} ({} ms)",
            report.attempted, report.delivered, report.retained, report.duration_ms
        );
        for error in &report.errors {
            println!("  {error}");
        }
        Ok(())
    }
}
