//! Transport port (driven/secondary port)
//!
//! This module defines the interface for delivering one payload to one
//! candidate endpoint. The delivery *protocol* (the ordered candidate loop)
//! lives in the coordinator; an implementation of this port only knows how
//! to perform a single attempt.
//!
//! ## Design Notes
//!
//! - [`ITransport::send`] returns a tagged [`SendOutcome`] rather than a
//!   `Result`: a rejected or unreachable endpoint is an expected outcome the
//!   candidate loop reacts to, not an exceptional condition.
//! - `list_remote` uses `anyhow::Result` because a listing failure is
//!   adapter-specific and the caller degrades it to an empty listing anyway.

use serde_json::Value;

use crate::domain::newtypes::EndpointUrl;
use crate::domain::submission::Payload;

/// Response body returned by the remote sink for an accepted submission
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteReceipt {
    /// Parsed response body; `Value::Null` when the sink returned no JSON
    pub body: Value,
}

impl RemoteReceipt {
    /// A receipt with no body
    #[must_use]
    pub const fn empty() -> Self {
        Self { body: Value::Null }
    }
}

/// Outcome of one send attempt against one candidate endpoint
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// The endpoint acknowledged the submission; its result halts the
    /// candidate loop
    Delivered {
        /// What the remote sink answered
        receipt: RemoteReceipt,
    },
    /// The endpoint was reached but answered with a non-success indication
    Rejected {
        /// Status line or application-level failure message
        reason: String,
    },
    /// The endpoint could not be reached: connect failure, DNS failure,
    /// or attempt timeout
    Unreachable {
        /// Underlying transport error, rendered for display
        reason: String,
    },
}

/// Port trait for submission delivery
///
/// ## Implementation Notes
///
/// - Every `send` attempt must be bounded by a timeout so that an
///   unreachable endpoint cannot stall the remaining candidates or a whole
///   drain pass; an elapsed timeout is reported as [`SendOutcome::Unreachable`].
/// - Implementations decide the wire encoding of the payload. The entry id
///   is not part of the payload and must never reach the remote side.
#[async_trait::async_trait]
pub trait ITransport: Send + Sync {
    /// Attempts to deliver `payload` to a single candidate endpoint
    async fn send(&self, endpoint: &EndpointUrl, payload: &Payload) -> SendOutcome;

    /// Best-effort listing of submissions already held by the remote sink
    ///
    /// Used only for diagnostics/display; callers degrade a failure to an
    /// empty listing.
    async fn list_remote(&self, endpoint: &EndpointUrl) -> anyhow::Result<Vec<Value>>;
}
