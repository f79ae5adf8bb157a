//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`ITransport`] - Delivery of payloads to remote candidate endpoints
//! - [`IQueueStore`] - Whole-blob persistence for the durable queue

pub mod queue_store;
pub mod transport;

pub use queue_store::IQueueStore;
pub use transport::{ITransport, RemoteReceipt, SendOutcome};
