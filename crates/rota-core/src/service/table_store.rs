//! Typed access to the two persisted tables.
//!
//! Every mutation follows the same read-modify-write sequence: read the
//! current payload and capture its version, decode, mutate, encode, then
//! write the new version and retire the version captured at read time. The
//! retired version is always the one read — never "the newest at write
//! time" — which is sound only under the deployment's single-writer-per-slot
//! precondition.

use std::sync::Arc;

use crate::domain::codec;
use crate::domain::entities::{MembershipTable, RotationPointerTable};
use crate::domain::errors::StoreError;
use crate::ports::outbound::{SecretStore, SecretVersion};

/// Slot holding the membership table (channel -> ordered member handles).
pub const MEMBERSHIP_SLOT: &str = "channel-member-handles";

/// Slot holding the rotation pointer table (channel -> last duty holder).
pub const ROTATION_POINTER_SLOT: &str = "channel-last-duty-holder";

/// Read-only slots owned by the transport layer: the chat API token and the
/// request signing secret. Listed here so every slot name lives in one
/// place; this core never writes them.
pub const CHAT_AUTH_TOKEN_SLOT: &str = "chat-auth-token";
pub const REQUEST_SIGNING_SECRET_SLOT: &str = "request-signing-secret";

/// Typed table store over a raw [`SecretStore`].
pub struct TableStore<S> {
    store: Arc<S>,
}

impl<S> Clone for TableStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SecretStore> TableStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Current membership table and the version to retire on the next
    /// write. `NotFound` if the slot was never written.
    pub async fn read_membership(&self) -> Result<(MembershipTable, SecretVersion), StoreError> {
        let current = self.store.read_current(MEMBERSHIP_SLOT).await?;
        Ok((codec::decode_membership(&current.payload), current.version))
    }

    /// Like [`read_membership`](Self::read_membership), but maps the
    /// first-run `NotFound` to an empty table with nothing to retire.
    pub async fn read_membership_or_empty(
        &self,
    ) -> Result<(MembershipTable, Option<SecretVersion>), StoreError> {
        match self.read_membership().await {
            Ok((table, version)) => Ok((table, Some(version))),
            Err(StoreError::NotFound { .. }) => Ok((MembershipTable::new(), None)),
            Err(err) => Err(err),
        }
    }

    pub async fn write_membership(
        &self,
        table: &MembershipTable,
        retire: Option<&SecretVersion>,
    ) -> Result<(), StoreError> {
        let payload = codec::encode_membership(table);
        self.store
            .write_new_version_and_retire(MEMBERSHIP_SLOT, &payload, retire)
            .await
    }

    /// Current rotation pointer table. A payload that does not parse fails
    /// this operation with `Malformed`; it is never coerced to an empty
    /// table.
    pub async fn read_rotation_pointer(
        &self,
    ) -> Result<(RotationPointerTable, SecretVersion), StoreError> {
        let current = self.store.read_current(ROTATION_POINTER_SLOT).await?;
        let table = codec::decode_rotation_pointer(&current.payload).map_err(|source| {
            StoreError::Malformed {
                slot: ROTATION_POINTER_SLOT.to_owned(),
                source,
            }
        })?;
        Ok((table, current.version))
    }

    pub async fn read_rotation_pointer_or_empty(
        &self,
    ) -> Result<(RotationPointerTable, Option<SecretVersion>), StoreError> {
        match self.read_rotation_pointer().await {
            Ok((table, version)) => Ok((table, Some(version))),
            Err(StoreError::NotFound { .. }) => Ok((RotationPointerTable::new(), None)),
            Err(err) => Err(err),
        }
    }

    pub async fn write_rotation_pointer(
        &self,
        table: &RotationPointerTable,
        retire: Option<&SecretVersion>,
    ) -> Result<(), StoreError> {
        let payload = codec::encode_rotation_pointer(table);
        self.store
            .write_new_version_and_retire(ROTATION_POINTER_SLOT, &payload, retire)
            .await
    }
}
