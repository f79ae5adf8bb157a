//! Outbox HTTP - transport and connectivity adapters
//!
//! Provides:
//! - [`HttpTransport`] - the [`ITransport`](outbox_core::ports::ITransport)
//!   port over reqwest, one bounded POST per candidate endpoint
//! - [`ConnectivityProbe`] - periodic reachability probe that emits a
//!   [`ConnectivityEvent::Restored`](outbox_core::scheduler::ConnectivityEvent)
//!   on each offline-to-online transition
//!
//! ## Modules
//!
//! - [`transport`] - outcome classification for a single send attempt
//! - [`connectivity`] - edge-detecting probe loop

pub mod connectivity;
pub mod transport;

pub use connectivity::ConnectivityProbe;
pub use transport::HttpTransport;
