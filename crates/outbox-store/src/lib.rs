//! Outbox Store - queue storage adapters
//!
//! Implements the [`IQueueStore`] port:
//!
//! - [`FileQueueStore`] - the queue blob as a single JSON file under the
//!   local data directory (the standalone analogue of the browser-local
//!   storage the original client used)
//! - [`MemoryQueueStore`] - ephemeral in-process storage, useful for tests
//!   and one-shot tooling
//!
//! The port's contract is whole-blob read/write only; no partial or append
//! semantics. Writes are atomic via write-to-temp + rename so a crashed
//! process never leaves a half-written queue behind.

use std::path::{Path, PathBuf};

use outbox_core::ports::queue_store::IQueueStore;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// File-backed queue store
///
/// Stores the queue blob at a fixed path, creating parent directories on
/// first write. A missing file reads as "nothing persisted yet".
pub struct FileQueueStore {
    path: PathBuf,
}

impl FileQueueStore {
    /// Creates a store persisting at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The blob path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl IQueueStore for FileQueueStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read(&self) -> anyhow::Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "queue blob read");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no queue blob yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, bytes), fields(path = %self.path.display(), bytes = bytes.len()))]
    async fn write(&self, bytes: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to a temporary file in the same directory so rename is atomic
        // (same filesystem).
        let tmp_path = {
            let mut p = self.path.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };

        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        debug!("queue blob written");
        Ok(())
    }
}

/// In-memory queue store
///
/// Holds the blob in process memory. Everything queued is lost when the
/// process exits; intended for tests and ephemeral tooling.
#[derive(Default)]
pub struct MemoryQueueStore {
    blob: Mutex<Option<Vec<u8>>>,
}

impl MemoryQueueStore {
    /// Creates an empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IQueueStore for MemoryQueueStore {
    async fn read(&self) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.blob.lock().await.clone())
    }

    async fn write(&self, bytes: &[u8]) -> anyhow::Result<()> {
        *self.blob.lock().await = Some(bytes.to_vec());
        Ok(())
    }
}
