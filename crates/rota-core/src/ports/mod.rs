//! Ports layer: inbound (driving) and outbound (driven) trait boundaries.

pub mod inbound;
pub mod outbound;

pub use inbound::{EventIngest, IgnoreReason, Outcome, RotationReport, RotationRun, SkipReason};
pub use outbound::{Notifier, RosterProvider, SecretStore, SecretVersion, VersionedPayload};
