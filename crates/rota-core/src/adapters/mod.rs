//! Adapters implementing the driven ports.
//!
//! Only in-memory implementations live here; the real secret-store, chat
//! and roster clients belong to the host process.

pub mod memory;

pub use memory::{InMemorySecretStore, RecordingNotifier, StaticRosterProvider};
