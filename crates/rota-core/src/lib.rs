//! # Rota Core
//!
//! Channel-state and rotation core of the standup automation: keeps each
//! chat channel's member list synchronized with live join/leave/mention
//! events, deterministically advances a per-channel "standup runner" duty,
//! and persists both through an external versioned secret store using a
//! read-modify-write-then-retire protocol.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `rotation`: next-duty-holder selection (wrap-around, restart rules)
//!   - `membership`: idempotent member-list mutations with explicit no-op
//!     signaling
//!   - `codec`: the flat-string wire format shared with stored state
//!   - `commands`: mention-command parsing (`add us` / `remove` / `add`)
//!   - `cadence`: weekend and sprint-boundary gates
//!
//! - **Ports Layer** (`ports/`): Trait boundaries
//!   - `EventIngest`, `RotationRun`: driving ports for the transport layer
//!   - `SecretStore`, `Notifier`, `RosterProvider`: driven ports for the
//!     versioned store, outbound chat, and live roster lookup
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `TableStore`: typed read-modify-write access to the two tables
//!   - `EventRouter`: inbound event dispatch
//!   - `DailyRotationJob`: the scheduled pass
//!
//! - **Events Layer** (`events/`): the decoded inbound event boundary
//!
//! - **Adapters Layer** (`adapters/`): in-memory driven-port
//!   implementations for tests and local runs
//!
//! ## Concurrency
//!
//! Single-writer-per-slot is a deployment precondition, not enforced here:
//! one instance processes one event or scheduled pass at a time. The
//! write-then-retire sequence is deliberately modeled as two non-atomic
//! steps; a failure between them leaves one extra stale version behind,
//! which is tolerated. Transient store failures surface to the caller
//! without internal retries.
//!
//! ## Usage Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rota_core::{
//!     DailyRotationJob, EventRouter, InMemorySecretStore, RecordingNotifier,
//!     RotaConfig, RotationRun, StaticRosterProvider,
//! };
//!
//! let store = Arc::new(InMemorySecretStore::new());
//! let notifier = Arc::new(RecordingNotifier::new());
//! let roster = Arc::new(StaticRosterProvider::new());
//!
//! let router = EventRouter::new(
//!     Arc::clone(&store),
//!     Arc::clone(&notifier),
//!     Arc::clone(&roster),
//!     RotaConfig::default(),
//! );
//! let job = DailyRotationJob::new(store, notifier, RotaConfig::default());
//!
//! // transport layer: router.dispatch(raw_event).await
//! // scheduler: job.run(today).await
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{InMemorySecretStore, RecordingNotifier, StaticRosterProvider};
pub use config::RotaConfig;
pub use domain::{
    ChannelId, CodecError, CommandError, ConfigError, EventError, MemberHandle, MembershipTable,
    MentionCommand, MutationOutcome, NotifyError, RosterError, RotaError, RotationPointerTable,
    StoreError,
};
pub use events::{InboundEvent, RawEvent};
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::{
    EventIngest, IgnoreReason, Notifier, Outcome, RosterProvider, RotationReport, RotationRun,
    SecretStore, SecretVersion, SkipReason, VersionedPayload,
};
pub use service::{DailyRotationJob, EventRouter, TableStore};
