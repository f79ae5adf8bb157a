//! Submit command - deliver a payload or queue it durably
//!
//! Builds a payload from `NAME=VALUE` field arguments (and optional
//! `--blob NAME=PATH` attachments), hands it to the coordinator, and
//! reports which of the two non-lost outcomes happened. The catastrophic
//! double-failure path surfaces as a nonzero exit.

use anyhow::{Context, Result};
use clap::Args;

use outbox_core::config::Config;
use outbox_core::coordinator::SubmitOutcome;
use outbox_core::domain::{FieldValue, Payload};

#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Form fields as NAME=VALUE pairs
    #[arg(value_parser = parse_pair, required = true)]
    pub fields: Vec<(String, String)>,

    /// Attach a file's contents as a binary field: NAME=PATH
    #[arg(long = "blob", value_name = "NAME=PATH", value_parser = parse_pair)]
    pub blobs: Vec<(String, String)>,
}

impl SubmitCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<()> {
        let mut payload = Payload::new();
        for (name, value) in self.fields {
            payload.insert(name, FieldValue::text(value));
        }
        for (name, path) in self.blobs {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read blob file {path}"))?;
            payload.insert(name, FieldValue::blob(bytes));
        }

        let (_queue, coordinator) = super::build(config)?;

        match coordinator.submit(payload).await? {
            SubmitOutcome::Delivered { receipt } => {
                if json {
                    println!(
                        "{}",
                        serde_json::json!({"status": "delivered", "remoteResult": receipt.body})
                    );
                } else {
                    println!("delivered");
                    if let Some(message) = receipt.body.get("message").and_then(|m| m.as_str()) {
                        println!("  {message}");
                    }
                }
            }
            SubmitOutcome::Queued { id } => {
                if json {
                    println!("{}", serde_json::json!({"status": "queued", "id": id}));
                } else {
                    println!("queued as {id} (will retry when connectivity returns)");
                }
            }
        }
        Ok(())
    }
}

/// Parse a `NAME=VALUE` argument.
fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}
