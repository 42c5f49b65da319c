//! Inbound ports (driving): what the transport layer calls into.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{ChannelId, MemberHandle};
use crate::domain::errors::RotaError;
use crate::events::RawEvent;

/// What the router did with one inbound event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A member was added to a channel list (join event or `add` command).
    /// `persisted` is false when the mutation was a no-op (duplicate event,
    /// channel never enrolled) — the notification is still sent.
    MemberAdded {
        channel: ChannelId,
        user: MemberHandle,
        persisted: bool,
    },
    /// A member was removed (leave event or `remove` command).
    MemberRemoved {
        channel: ChannelId,
        user: MemberHandle,
        persisted: bool,
    },
    /// The channel's roster was resolved and stored, with the rotation
    /// pointer seeded when the roster was non-empty.
    ChannelEnrolled {
        channel: ChannelId,
        roster_size: usize,
    },
    /// The event was ignored. Never an error to the transport.
    Ignored(IgnoreReason),
    /// An inner operation failed; logged, converted here, not propagated.
    Failed { detail: String },
}

/// Why an event was ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownEventType(String),
    MalformedEvent(String),
    InvalidCommand,
    /// The event concerns the automation's own handle.
    SelfEvent,
}

/// Report of one daily rotation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RotationReport {
    /// Set when the pass did not run at all.
    pub skipped: Option<SkipReason>,
    /// Channel -> newly appointed duty holder.
    pub advanced: BTreeMap<ChannelId, MemberHandle>,
    pub notified: usize,
    pub notify_failures: usize,
}

impl RotationReport {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Weekend,
    SprintBoundary,
}

/// Event ingestion API (driving port). Implemented by the event router;
/// never fails toward the transport — every error class becomes a logged
/// [`Outcome`].
#[async_trait]
pub trait EventIngest: Send + Sync {
    async fn dispatch(&self, raw: RawEvent) -> Outcome;
}

/// Scheduled rotation API (driving port). Implemented by the daily rotation
/// job. Store failures are surfaced to the caller; per-channel notification
/// failures are isolated and reported, not raised.
#[async_trait]
pub trait RotationRun: Send + Sync {
    async fn run(&self, today: NaiveDate) -> Result<RotationReport, RotaError>;
}
