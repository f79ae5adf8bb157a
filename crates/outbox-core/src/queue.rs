//! Durable submission queue
//!
//! [`SubmissionQueue`] owns the ordered store of pending entries. It is pure
//! data-structure logic over the [`IQueueStore`] port: no delivery policy,
//! no knowledge of endpoints. The persisted representation is the JSON
//! serialization of the full entry list, rewritten on every mutation, so all
//! mutations are serialized through a single async mutex (single-writer
//! discipline; the blob is not addressable per-entry).

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::errors::PersistenceError;
use crate::domain::newtypes::EntryId;
use crate::domain::submission::{Entry, Payload};
use crate::ports::queue_store::IQueueStore;

/// Id allocation state, kept under the queue mutex so an id is reserved and
/// persisted in the same critical section.
struct IdCursor {
    last_issued: i64,
}

/// Durable, ordered storage of pending submission entries
///
/// Invariants:
/// - ids are unique within the queue at all times;
/// - insertion order is preserved (oldest first), since retry order follows
///   arrival order;
/// - an entry exists in the queue if and only if it has not yet been
///   confirmed delivered.
pub struct SubmissionQueue {
    store: Arc<dyn IQueueStore>,
    cursor: tokio::sync::Mutex<IdCursor>,
}

impl SubmissionQueue {
    /// Creates a queue over the given storage capability
    pub fn new(store: Arc<dyn IQueueStore>) -> Self {
        Self {
            store,
            cursor: tokio::sync::Mutex::new(IdCursor { last_issued: 0 }),
        }
    }

    /// Appends a payload as a fresh entry and persists the updated queue
    ///
    /// Assigns a monotonically increasing id (milliseconds-since-epoch,
    /// bumped past the last issued id and past any id already present) and
    /// timestamps the entry.
    ///
    /// # Errors
    ///
    /// [`PersistenceError::Write`] when the storage capability rejects the
    /// write. This must reach the caller: an unpersisted entry is a lost
    /// submission, not a recoverable condition.
    pub async fn append(&self, payload: Payload) -> Result<Entry, PersistenceError> {
        let mut cursor = self.cursor.lock().await;

        let mut entries = self.load_degraded().await;
        let id = Self::allocate_id(&mut cursor, &entries);
        let entry = Entry {
            id,
            payload,
            queued_at: Utc::now(),
        };

        entries.push(entry.clone());
        self.persist(&entries).await?;
        debug!(id = %entry.id, pending = entries.len(), "entry queued");
        Ok(entry)
    }

    /// Returns all pending entries in insertion order
    ///
    /// Malformed or unreadable stored data degrades to an empty list rather
    /// than failing the caller; the anomaly is reported through the tracing
    /// channel. A queue that cannot be read still allows new submissions to
    /// be attempted.
    pub async fn list(&self) -> Vec<Entry> {
        let _cursor = self.cursor.lock().await;
        self.load_degraded().await
    }

    /// Removes the entry with the given id, if present
    ///
    /// Idempotent: removing an absent id is a no-op, since the same
    /// completion signal may be observed more than once under retry.
    /// Returns whether an entry was actually removed.
    ///
    /// # Errors
    ///
    /// [`PersistenceError::Write`] when persisting the shrunken queue fails;
    /// the entry then remains queued and will be retried.
    pub async fn remove(&self, id: EntryId) -> Result<bool, PersistenceError> {
        let _cursor = self.cursor.lock().await;

        let mut entries = self.load_degraded().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);

        if entries.len() == before {
            debug!(%id, "remove: id not present (already removed)");
            return Ok(false);
        }

        self.persist(&entries).await?;
        debug!(%id, pending = entries.len(), "entry removed");
        Ok(true)
    }

    /// Drops every pending entry and returns how many were dropped
    pub async fn clear(&self) -> Result<usize, PersistenceError> {
        let _cursor = self.cursor.lock().await;

        let entries = self.load_degraded().await;
        if entries.is_empty() {
            return Ok(0);
        }
        self.persist(&[]).await?;
        debug!(dropped = entries.len(), "queue cleared");
        Ok(entries.len())
    }

    /// Strict load: read the blob and parse it, classifying failures
    async fn load_strict(&self) -> Result<Vec<Entry>, PersistenceError> {
        let blob = self.store.read().await.map_err(PersistenceError::Read)?;
        match blob {
            None => Ok(Vec::new()),
            Some(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| PersistenceError::Corrupted {
                    detail: e.to_string(),
                })
            }
        }
    }

    /// Recoverable-local load: degrade failures to an empty queue with a
    /// diagnostic. Callers that must not swallow failures use `load_strict`.
    async fn load_degraded(&self) -> Vec<Entry> {
        match self.load_strict().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "pending queue unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    async fn persist(&self, entries: &[Entry]) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec(entries)
            .map_err(|e| PersistenceError::Write(anyhow::Error::new(e)))?;
        self.store
            .write(&bytes)
            .await
            .map_err(PersistenceError::Write)
    }

    /// Allocates the next id: wall clock, bumped past the last issued id and
    /// past any id already present in the queue (restart within the same
    /// millisecond).
    fn allocate_id(cursor: &mut IdCursor, entries: &[Entry]) -> EntryId {
        let mut candidate = Utc::now().timestamp_millis().max(cursor.last_issued + 1);
        while entries.iter().any(|e| e.id.as_millis() == candidate) {
            candidate += 1;
        }
        cursor.last_issued = candidate;
        EntryId::from_millis(candidate)
    }
}
