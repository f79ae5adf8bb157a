//! Submission payloads and queued entries
//!
//! A [`Payload`] is what callers hand to the coordinator: an ordered mapping
//! from field name to [`FieldValue`]. The queue wraps it in an [`Entry`] with
//! a local id and timestamp when delivery has to be deferred.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::EntryId;

/// One form-field value: plain text or a binary attachment
///
/// Adjacently tagged so that a base64-encoded blob can never be confused
/// with a text field that happens to contain base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum FieldValue {
    /// Plain text field
    Text(String),
    /// Binary attachment; base64-encoded in serialized form
    Blob(#[serde(with = "base64_blob")] Vec<u8>),
}

impl FieldValue {
    /// Convenience constructor for a text field
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Convenience constructor for a binary field
    #[must_use]
    pub fn blob(bytes: Vec<u8>) -> Self {
        Self::Blob(bytes)
    }

    /// Returns the text content, if this is a text field
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Blob(_) => None,
        }
    }
}

/// A submission payload: field name to value, opaque to the queue
pub type Payload = BTreeMap<String, FieldValue>;

/// One durably queued pending submission
///
/// Created by the coordinator when direct delivery fails; destroyed when a
/// later drain pass confirms delivery. An entry exists in the queue if and
/// only if its payload has not yet been confirmed delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Local removal key, unique within the queue
    pub id: EntryId,
    /// The deferred submission payload
    pub payload: Payload,
    /// When the entry was queued
    pub queued_at: DateTime<Utc>,
}

/// Serde helper: `Vec<u8>` as a base64 string
mod base64_blob {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
