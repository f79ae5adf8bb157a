//! Queue store port (driven/secondary port)
//!
//! Whole-blob persistence for the durable queue. The queue is read fully
//! into memory on any operation and rewritten in full on every mutation;
//! no partial or append semantics are required of the storage capability.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (filesystem, browser storage, ...) and are classified into
//!   [`PersistenceError`](crate::domain::PersistenceError) by the queue.
//! - Implementations must make `write` replace the previous blob atomically
//!   enough that a reader never observes a half-written queue.

#[async_trait::async_trait]
pub trait IQueueStore: Send + Sync {
    /// Reads the entire persisted queue blob
    ///
    /// Returns `None` when nothing has been persisted yet; the queue treats
    /// that as empty.
    async fn read(&self) -> anyhow::Result<Option<Vec<u8>>>;

    /// Replaces the entire persisted queue blob
    async fn write(&self, bytes: &[u8]) -> anyhow::Result<()>;
}
