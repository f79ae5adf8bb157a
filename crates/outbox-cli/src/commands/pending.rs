//! Pending command - list locally queued submissions

use anyhow::Result;
use clap::Args;

use outbox_core::config::Config;
use outbox_core::domain::{Entry, FieldValue};

#[derive(Debug, Args)]
pub struct PendingCommand {}

impl PendingCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<()> {
        let (queue, _coordinator) = super::build(config)?;
        let entries = queue.list().await;

        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        if entries.is_empty() {
            println!("no pending submissions");
            return Ok(());
        }

        for entry in &entries {
            println!("{}", describe(entry));
        }
        println!("{} pending", entries.len());
        Ok(())
    }
}

/// One line per entry: id, queue time, field summary.
fn describe(entry: &Entry) -> String {
    let fields = entry
        .payload
        .iter()
        .map(|(name, value)| match value {
            FieldValue::Text(text) => format!("{name}={text}"),
            FieldValue::Blob(bytes) => format!("{name}=<blob {} bytes>", bytes.len()),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}  {}  {}",
        entry.id,
        entry.queued_at.format("%Y-%m-%d %H:%M:%S UTC"),
        fields
    )
}
