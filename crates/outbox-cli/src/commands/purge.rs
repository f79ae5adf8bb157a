//! Purge command - drop every locally queued submission

use anyhow::Result;
use clap::Args;

use outbox_core::config::Config;

#[derive(Debug, Args)]
pub struct PurgeCommand {
    /// Actually drop the entries; without this flag only the count is shown
    #[arg(long)]
    pub yes: bool,
}

impl PurgeCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<()> {
        let (queue, _coordinator) = super::build(config)?;

        if !self.yes {
            let pending = queue.list().await.len();
            if json {
                println!("{}", serde_json::json!({"pending": pending, "purged": 0}));
            } else {
                println!("{pending} pending submission(s) would be dropped; re-run with --yes");
            }
            return Ok(());
        }

        let dropped = queue.clear().await?;
        if json {
            println!("{}", serde_json::json!({"purged": dropped}));
        } else {
            println!("dropped {dropped} pending submission(s)");
        }
        Ok(())
    }
}
