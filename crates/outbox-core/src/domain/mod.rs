//! Domain entities and value types
//!
//! Pure data types with no I/O: the submission payload model, the queued
//! entry, validated newtypes, and the error taxonomy shared across the crate.

pub mod errors;
pub mod newtypes;
pub mod submission;

pub use errors::{
    AttemptFailure, DeliveryFailure, DomainError, EndpointAttempt, PersistenceError,
    SubmissionLost,
};
pub use newtypes::{EndpointUrl, EntryId};
pub use submission::{Entry, FieldValue, Payload};
