//! Domain error taxonomy
//!
//! Three layers of failure, matching how far a submission got:
//!
//! - [`DeliveryFailure`] - every candidate endpoint failed for one attempt;
//!   recovered locally by falling back to the queue (or leaving an entry
//!   queued during a drain).
//! - [`PersistenceError`] - durable storage failed; write failures propagate,
//!   read failures degrade to an empty queue with a diagnostic.
//! - [`SubmissionLost`] - both delivery and queuing failed; the one condition
//!   that is never absorbed silently.

use thiserror::Error;

use super::newtypes::EndpointUrl;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid endpoint URL format or scheme
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// Invalid entry id format
    #[error("Invalid entry id: {0}")]
    InvalidId(String),
}

/// Why a single candidate endpoint did not accept a payload
///
/// The delivery protocol treats both variants identically (move on to the
/// next candidate) but the distinction is preserved for logs and reports:
/// a misconfigured URL shows up as `Unreachable`, a failing server as
/// `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The endpoint answered, but with a non-success indication
    Rejected {
        /// Status line or application-level failure message
        reason: String,
    },
    /// The endpoint could not be reached (connect failure, DNS, timeout)
    Unreachable {
        /// Underlying transport error, rendered for display
        reason: String,
    },
}

impl AttemptFailure {
    /// Short classification label for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "rejected",
            Self::Unreachable { .. } => "unreachable",
        }
    }

    /// The failure detail
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Rejected { reason } | Self::Unreachable { reason } => reason,
        }
    }
}

/// Record of one failed candidate attempt within a delivery pass
#[derive(Debug, Clone)]
pub struct EndpointAttempt {
    /// The candidate that was tried
    pub endpoint: EndpointUrl,
    /// How it failed
    pub failure: AttemptFailure,
}

/// All configured candidate endpoints failed for one delivery attempt
///
/// This is an expected outcome, not a crash: the caller applies the fallback
/// policy (queue on submit, retain on drain). The per-endpoint attempts are
/// kept so diagnostics can tell a wrong URL from a failing server.
#[derive(Debug, Error)]
#[error("delivery failed: all {} candidate endpoint(s) exhausted", attempts.len())]
pub struct DeliveryFailure {
    /// One record per candidate tried, in configuration order
    pub attempts: Vec<EndpointAttempt>,
}

impl DeliveryFailure {
    /// One-line summary of every failed attempt, for drain reports
    #[must_use]
    pub fn summary(&self) -> String {
        if self.attempts.is_empty() {
            return "no candidate endpoints configured".to_string();
        }
        self.attempts
            .iter()
            .map(|a| format!("{} {}: {}", a.endpoint, a.failure.kind(), a.failure.reason()))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Durable storage read or write failed
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The storage capability rejected a read
    #[error("queue storage read failed")]
    Read(#[source] anyhow::Error),

    /// The storage capability rejected a write (quota, permissions, ...)
    #[error("queue storage write failed")]
    Write(#[source] anyhow::Error),

    /// Stored data could not be parsed as valid queue data
    #[error("queue data is corrupted: {detail}")]
    Corrupted {
        /// Parser diagnostic
        detail: String,
    },
}

/// Both delivery and durable queuing failed for one submission
///
/// The caller must be told the data was neither delivered nor saved.
#[derive(Debug, Error)]
#[error("submission lost: neither delivered ({delivery}) nor durably queued")]
pub struct SubmissionLost {
    /// Why every candidate endpoint failed
    pub delivery: DeliveryFailure,
    /// Why the fallback append failed
    #[source]
    pub persistence: PersistenceError,
}
