//! Outbound adapters implementing domain ports.
//!
//! Adapters are thin translators between domain types and their storage.
//! They contain no business logic.
//!
//! - **memory**: process-local stores behind `tokio::sync::RwLock`, plus the
//!   demo seed used for local runs.

pub mod memory;
