//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for identifiers and values used across the
//! submission pipeline. Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::errors::DomainError;

// ============================================================================
// EntryId
// ============================================================================

/// Identifier for a queued submission entry
///
/// Wraps a milliseconds-since-epoch value. Ids are assigned by
/// [`SubmissionQueue::append`](crate::queue::SubmissionQueue::append): each
/// fresh id is strictly greater than every id issued before it and distinct
/// from every id currently in the queue, so insertion order and id order
/// coincide. The id is a local removal key only; it is never sent to the
/// remote side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    /// Create an EntryId from a raw milliseconds-since-epoch value
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Get the inner milliseconds value
    #[must_use]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("{s}: {e}")))
    }
}

// ============================================================================
// EndpointUrl
// ============================================================================

/// A validated candidate endpoint for submission delivery
///
/// Only absolute `http`/`https` URLs are accepted; anything else is a
/// [`DomainError::InvalidEndpoint`] at construction time, so the delivery
/// protocol never has to re-validate mid-loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointUrl(Url);

impl EndpointUrl {
    /// Parse and validate an endpoint URL
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let url = Url::parse(s).map_err(|e| DomainError::InvalidEndpoint(format!("{s}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(DomainError::InvalidEndpoint(format!(
                "{s}: unsupported scheme '{other}'"
            ))),
        }
    }

    /// Get the inner URL
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    /// String form of the endpoint
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EndpointUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EndpointUrl {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EndpointUrl {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}
