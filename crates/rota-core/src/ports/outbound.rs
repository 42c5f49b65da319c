//! Outbound ports (driven): the versioned secret store, the outbound chat
//! notifier, and the live channel-roster lookup.
//!
//! All three are external collaborators; nothing in this crate performs
//! network I/O directly.

use async_trait::async_trait;

use crate::domain::entities::{ChannelId, MemberHandle};
use crate::domain::errors::{NotifyError, RosterError, StoreError};

/// Opaque token identifying one revision of a slot's payload. Required to
/// retire that revision after a successful write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretVersion(String);

impl SecretVersion {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A slot's current payload together with its version token.
#[derive(Clone, Debug)]
pub struct VersionedPayload {
    pub payload: String,
    pub version: SecretVersion,
}

/// Versioned key-value secret service (driven port).
///
/// The write path is a two-step protocol, not a transaction: the new version
/// is appended first, then the superseded version is explicitly retired. A
/// failure between the two steps leaves one extra stale version behind —
/// tolerated, never auto-corrected. The protocol is safe only under the
/// deployment's single-writer-per-slot precondition; under concurrent
/// writers it loses updates and can retire a live version.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Current payload and version of a slot. `NotFound` if the slot was
    /// never written.
    async fn read_current(&self, slot: &str) -> Result<VersionedPayload, StoreError>;

    /// Append `payload` as the slot's new current version, then retire
    /// `retire`. `None` covers the implicit-creation first write, where
    /// there is nothing to retire.
    async fn write_new_version_and_retire(
        &self,
        slot: &str,
        payload: &str,
        retire: Option<&SecretVersion>,
    ) -> Result<(), StoreError>;
}

/// Outbound chat messages (driven port). Fire-and-forget from the services'
/// perspective: delivery errors are logged by callers, never propagated.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, channel: &ChannelId, text: &str) -> Result<(), NotifyError>;
}

/// Live channel roster as reported by the chat platform (driven port).
/// Only the enroll-channel command path consults it.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    async fn list_channel_members(
        &self,
        channel: &ChannelId,
    ) -> Result<Vec<MemberHandle>, RosterError>;
}
